use crush::coding::hist::num_bits;
use crush::coding::hist::Histogram;

#[test]
fn test_num_bits() {
    assert_eq!(num_bits(0), 0);
    assert_eq!(num_bits(3), 2);
    assert_eq!(num_bits(7), 3);
    assert_eq!(num_bits(10), 4);
    assert_eq!(num_bits(256), 9);
}

#[test]
fn test_hist() {
    use rand::thread_rng;
    use rand_distr::{Distribution, Normal};

    let mut data: Vec<u8> = Vec::new();

    let mut rng = thread_rng();
    let normal = Normal::new(35.0_f32, 10.0_f32).unwrap();
    for _ in 0..10000 {
        let v = normal.sample(&mut rng);
        data.push(v as u8);
    }

    let hist: Histogram<256> = Histogram::from_data(&data);
    let total: u32 = hist.get_bins().iter().sum();
    assert_eq!(total, 10000);
    hist.dump();
}

#[test]
fn test_small_generic() {
    let data: Vec<u8> = vec![
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 10
        1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 10
        2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // 12
    ];
    let hist: Histogram<3> = Histogram::from_data(&data);
    assert_eq!(hist.get_bins(), &[10, 10, 12]);
    assert_eq!(hist.used_symbols(), 3);
    hist.dump();
}

#[test]
fn test_add_and_halve() {
    let mut hist = Histogram::<8>::new();
    assert_eq!(hist.used_symbols(), 0);
    hist.dump();

    for _ in 0..9 {
        hist.add(2);
    }
    hist.add(5);
    assert_eq!(hist.get_bins(), &[0, 0, 9, 0, 0, 1, 0, 0]);

    // Halving never drops a used symbol.
    hist.halve();
    assert_eq!(hist.get_bins(), &[0, 0, 4, 0, 0, 1, 0, 0]);
    for _ in 0..10 {
        hist.halve();
    }
    assert_eq!(hist.get_bins(), &[0, 0, 1, 0, 0, 1, 0, 0]);
    assert_eq!(hist.used_symbols(), 2);
}
