//! Parse, displacement and color-lookup benchmarks.

use std::fmt::Write;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use foldshift::color::{style_function_for, ColorRamp};
use foldshift::compare::compute_displacement;
use foldshift::structure::{parse, parse_structure};

/// Synthetic helix-like backbone with `residues` residues of N/CA/C atoms.
fn synthetic_pdb(residues: i32, shift: f64) -> String {
    let mut out = String::new();
    let mut serial = 1;
    for residue in 1..=residues {
        let t = f64::from(residue) * 100f64.to_radians();
        let ca = [2.3 * t.cos(), 2.3 * t.sin(), 1.5 * f64::from(residue)];
        for (name, dx) in [("N", -1.2), ("CA", 0.0), ("C", 1.3)] {
            let _ = writeln!(
                out,
                "ATOM  {serial:>5} {name:<4} ALA A{residue:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}           C",
                ca[0] + dx + shift,
                ca[1],
                ca[2],
                1.0,
                50.0 + f64::from(residue % 50),
            );
            serial += 1;
        }
    }
    out
}

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for count in [100, 400, 2000] {
        let text = synthetic_pdb(count, 0.0);
        let _ = group.bench_function(format!("{count}_residues"), |b| {
            b.iter(|| black_box(parse_structure(black_box(&text))));
        });
    }
    group.finish();
}

fn displacement_benchmark(c: &mut Criterion) {
    let wild = parse(&synthetic_pdb(2000, 0.0));
    let mutant = parse(&synthetic_pdb(2000, 0.4));
    let _ = c.bench_function("displacement_2000_residues", |b| {
        b.iter(|| black_box(compute_displacement(black_box(&wild), black_box(&mutant))));
    });
}

fn color_lookup_benchmark(c: &mut Criterion) {
    let wild = parse(&synthetic_pdb(400, 0.0));
    let mutant = parse(&synthetic_pdb(400, 0.4));
    let table = Rc::new(compute_displacement(&wild, &mutant));
    let color = style_function_for(table, ColorRamp::displacement());
    let _ = c.bench_function("per_atom_color_1200_atoms", |b| {
        b.iter(|| {
            for atom in 0..1200usize {
                let _ = black_box(color(black_box((atom / 3) as i32 + 1), atom));
            }
        });
    });
}

criterion_group!(
    benches,
    parse_benchmark,
    displacement_benchmark,
    color_lookup_benchmark
);
criterion_main!(benches);
