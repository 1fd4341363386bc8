//! # Inverse Kinematics Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arm_lib::arm_ctrl::{
    forward_kinematics, inverse_kinematics, AngleConvention, JointAngles, LinkChain, Pose,
};

fn ik_benchmark(c: &mut Criterion) {
    let convention = AngleConvention::VERTICAL_ZERO;

    // ---- 2 link chain ----

    let chain_2 = LinkChain::new(vec![120.0, 210.0]).unwrap();
    let target_2 = Pose::new(150.0, 180.0);

    c.bench_function("inverse_kinematics::2_link", |b| {
        b.iter(|| {
            inverse_kinematics(black_box(&chain_2), black_box(&target_2), &convention).unwrap()
        })
    });

    // ---- 3 link chain ----

    let chain_3 = LinkChain::default();
    let target_3 = Pose::with_orientation(200.0, 150.0, 0.0);

    c.bench_function("inverse_kinematics::3_link", |b| {
        b.iter(|| {
            inverse_kinematics(black_box(&chain_3), black_box(&target_3), &convention).unwrap()
        })
    });

    // ---- Round trip ----

    let angles = JointAngles::new(vec![-30.0, 45.0, 20.0]);

    c.bench_function("forward_inverse_round_trip::3_link", |b| {
        b.iter(|| {
            let pose = forward_kinematics(&chain_3, black_box(&angles), &convention).unwrap();
            inverse_kinematics(&chain_3, &pose, &convention).unwrap()
        })
    });
}

criterion_group!(benches, ik_benchmark);
criterion_main!(benches);
