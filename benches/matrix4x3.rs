use criterion::{Criterion, black_box, criterion_group, criterion_main};
use impact_transform::{Matrix4, Matrix4x3, Matrix4x3Properties, Vector3};

fn model_matrix() -> Matrix4x3<f32> {
    let mut m = Matrix4x3::translation(&Vector3::new(1.0, -2.0, 3.0));
    m.rotate(0.7, &Vector3::new(0.6, 0.0, 0.8))
        .scale(&Vector3::new(2.0, 1.0, 0.5));
    m
}

pub fn bench_product(c: &mut Criterion) {
    let a = model_matrix();
    let b = Matrix4x3::rotation_y(0.3);
    let (a4, b4) = (Matrix4::from(&a), Matrix4::from(&b));

    c.bench_function("matrix4x3_multiply", |bench| {
        let mut dst = Matrix4x3::zeros();
        bench.iter(|| black_box(&a).multiply_into(black_box(&b), &mut dst));
    });
    c.bench_function("matrix4x3_multiply_as_matrix4", |bench| {
        let mut dst = Matrix4::zeros();
        bench.iter(|| black_box(&a4).multiply_into(black_box(&b4), &mut dst));
    });
}

pub fn bench_inverse(c: &mut Criterion) {
    let orthonormal = Matrix4x3::rotation_xyz(0.1, 0.2, 0.3);
    let mut generic = orthonormal;
    generic.assume_properties_unchecked(Matrix4x3Properties::empty());

    c.bench_function("matrix4x3_invert_orthonormal", |bench| {
        bench.iter(|| black_box(&orthonormal).inverted());
    });
    c.bench_function("matrix4x3_invert_affine", |bench| {
        bench.iter(|| black_box(&generic).inverted());
    });
}

criterion_group!(benches, bench_product, bench_inverse);
criterion_main!(benches);
