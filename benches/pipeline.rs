use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use gridin::Format;

/// UCD file of a `size × size` grid of unit squares, with every other cell
/// numbered clockwise.
fn structured_ucd(size: usize) -> String {
    let v = |i: usize, j: usize| 1 + i + (size + 1) * j;
    let mut ucd = format!("{} {} 0 0 0\n", (size + 1) * (size + 1), size * size);
    for j in 0..=size {
        for i in 0..=size {
            ucd += &format!("{} {i} {j} 0\n", v(i, j));
        }
    }
    for c in 0..size * size {
        let (i, j) = (c % size, c / size);
        let [a, b, c2, d] = [v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1)];
        if c % 2 == 0 {
            ucd += &format!("{} 0 quad {a} {b} {c2} {d}\n", c + 1);
        } else {
            ucd += &format!("{} 0 quad {a} {d} {c2} {b}\n", c + 1);
        }
    }
    ucd
}

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for size in [16, 64, 256] {
        let input = structured_ucd(size);
        group.bench_function(&format!("ucd_{size}x{size}"), |b| {
            b.iter(|| gridin::parse::<2>(Format::Ucd, black_box(input.as_bytes())))
        });
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
