use criterion::*;
use sparq::prelude::*;

fn perf_test(q_num: usize, t_num: usize) {
    #[cfg(feature = "cpu")]
    sparq::num_threads(t_num);
    #[cfg(not(feature = "cpu"))]
    let _ = t_num;

    let mut reg = QReg::new(0, q_num).unwrap();
    reg.apply(&op::walsh(q_num)).unwrap();
    for t in 1..q_num {
        reg.apply(&op::cond_phase(t, 0)).unwrap();
    }

    let (_, reg) = reg.measure_bit(0).unwrap();
    assert_eq!(reg.width(), q_num - 1);
}

fn performance(c: &mut Criterion) {
    #[cfg(feature = "cpu")]
    let count = rayon::current_num_threads();
    #[cfg(not(feature = "cpu"))]
    let count = 1;

    for th_num in 1..=count {
        for qu_num in [10, 12, 14] {
            c.bench_function(
                format!("evaluate_qu{}_th{}", qu_num, th_num).as_str(),
                |b| b.iter(|| perf_test(black_box(qu_num), black_box(th_num))),
            );
        }
    }
}

criterion_group!(benches, performance);
criterion_main!(benches);
