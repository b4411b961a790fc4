use criterion::{Criterion, black_box, criterion_group, criterion_main};
use impact_transform::{Matrix4, Matrix4Properties, Vector3};

fn model_matrix() -> Matrix4<f32> {
    let mut m = Matrix4::translation(&Vector3::new(1.0, -2.0, 3.0));
    m.rotate(0.7, &Vector3::new(0.6, 0.0, 0.8))
        .scale(&Vector3::new(2.0, 1.0, 0.5));
    m
}

fn without_properties(m: &Matrix4<f32>) -> Matrix4<f32> {
    let mut generic = *m;
    generic.assume_properties_unchecked(Matrix4Properties::empty());
    generic
}

pub fn bench_affine_product(c: &mut Criterion) {
    let a = model_matrix();
    let b = Matrix4::rotation_y(0.3);
    let (generic_a, generic_b) = (without_properties(&a), without_properties(&b));

    c.bench_function("matrix4_multiply_affine", |bench| {
        let mut dst = Matrix4::zeros();
        bench.iter(|| black_box(&a).multiply_into(black_box(&b), &mut dst));
    });
    c.bench_function("matrix4_multiply_generic", |bench| {
        let mut dst = Matrix4::zeros();
        bench.iter(|| black_box(&generic_a).multiply_into(black_box(&generic_b), &mut dst));
    });
}

pub fn bench_inverse(c: &mut Criterion) {
    let orthonormal = Matrix4::rotation_xyz(0.1, 0.2, 0.3);
    let affine = model_matrix();
    let generic = without_properties(&affine);

    c.bench_function("matrix4_invert_orthonormal", |bench| {
        bench.iter(|| black_box(&orthonormal).inverted());
    });
    c.bench_function("matrix4_invert_affine", |bench| {
        bench.iter(|| black_box(&affine).inverted());
    });
    c.bench_function("matrix4_invert_generic", |bench| {
        bench.iter(|| black_box(&generic).inverted());
    });
}

pub fn bench_transform_chain(c: &mut Criterion) {
    c.bench_function("matrix4_translate_rotate_scale_chain", |bench| {
        bench.iter(|| {
            let mut m = Matrix4::<f32>::identity();
            m.translate(black_box(&Vector3::new(1.0, 2.0, 3.0)))
                .rotate_x(black_box(0.4))
                .scale(black_box(&Vector3::same(2.0)));
            m
        });
    });
}

criterion_group!(
    benches,
    bench_affine_product,
    bench_inverse,
    bench_transform_chain
);
criterion_main!(benches);
