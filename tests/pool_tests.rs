#[cfg(test)]
mod tests {
    use energy_market_engine::*;
    use std::thread;

    const EPS: f64 = 1e-6;

    // ========== Reference Pool ==========

    #[test]
    fn test_reference_pool_demo() {
        let mut pool = ConstantProductPool::new(1000.0, 10000.0).expect("test: valid reserves");
        assert_eq!(pool.status().invariant_k, 10_000_000.0);
        assert_eq!(pool.price(), 10.0);

        let received = pool.swap_a_for_b(100.0).expect("test: positive amount");
        assert!((received - 906.61).abs() < 0.005);
        assert!((received - 906.6108938801499).abs() < EPS);

        let status = pool.status();
        assert!((status.reserve_a - 1099.7).abs() < EPS);
        assert!((status.reserve_b - 10_000_000.0 / 1099.7).abs() < EPS);
        assert_eq!(status.invariant_k, status.reserve_a * status.reserve_b);
    }

    #[test]
    fn test_fee_is_thirty_basis_points() {
        let pool = ConstantProductPool::new(5000.0, 5000.0).expect("test: valid reserves");
        let quote = pool.quote_a_for_b(1000.0).expect("test: positive amount");
        assert!((quote.fee - 3.0).abs() < 1e-12);
        assert!((quote.new_reserve_a - 5997.0).abs() < 1e-9);
    }

    // ========== Monotonicity ==========

    #[test]
    fn test_amount_out_strictly_increasing_in_amount_in() {
        let pool = ConstantProductPool::new(1000.0, 10000.0).expect("test: valid reserves");
        let outs: Vec<f64> = (1..=200)
            .map(|i| pool.quote_a_for_b(i as f64 * 5.0).expect("test: positive amount").amount_out)
            .collect();
        assert!(outs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_sequential_swaps_drain_b() {
        let mut pool = ConstantProductPool::new(1000.0, 10000.0).expect("test: valid reserves");
        let mut total_out = 0.0;
        for _ in 0..100 {
            let before = pool.status();
            let out = pool.swap_a_for_b(50.0).expect("test: positive amount");
            let after = pool.status();
            assert!(out > 0.0);
            assert!(after.reserve_a > before.reserve_a);
            assert!(after.reserve_b < before.reserve_b);
            total_out += out;
        }
        assert!(total_out < 10000.0, "pool can never pay out its whole B reserve");
        assert!((pool.reserve_b() - (10000.0 - total_out)).abs() < 1e-6);
    }

    #[test]
    fn test_price_falls_as_a_is_sold() {
        let mut pool = ConstantProductPool::new(1000.0, 10000.0).expect("test: valid reserves");
        let mut last = pool.price();
        for _ in 0..10 {
            pool.swap_a_for_b(100.0).expect("test: positive amount");
            assert!(pool.price() < last);
            last = pool.price();
        }
    }

    // ========== Errors ==========

    #[test]
    fn test_invalid_amount() {
        let mut pool = ConstantProductPool::new(1000.0, 10000.0).expect("test: valid reserves");
        assert_eq!(pool.swap_a_for_b(0.0), Err(PoolError::InvalidAmount(0.0)));
        assert_eq!(pool.swap_a_for_b(-10.0), Err(PoolError::InvalidAmount(-10.0)));
        assert_eq!(pool.price(), 10.0);
    }

    // ========== Shared Access ==========

    #[test]
    fn test_shared_pool_matches_sequential_execution() {
        let shared = SharedPool::new(ConstantProductPool::new(1000.0, 10000.0).expect("test: valid reserves"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = shared.clone();
                thread::spawn(move || {
                    (0..25).map(|_| pool.swap_a_for_b(1.0).expect("test: positive amount")).sum::<f64>()
                })
            })
            .collect();
        let paid_out: f64 = handles.into_iter().map(|h| h.join().expect("test: worker thread")).sum();

        let mut sequential = ConstantProductPool::new(1000.0, 10000.0).expect("test: valid reserves");
        let expected: f64 = (0..100).map(|_| sequential.swap_a_for_b(1.0).expect("test: positive amount")).sum();

        // Equal-size swaps commute, so any serialized order lands on the same state
        assert!((shared.status().reserve_a - sequential.reserve_a()).abs() < EPS);
        assert!((shared.status().reserve_b - sequential.reserve_b()).abs() < EPS);
        assert!((paid_out - expected).abs() < EPS);
    }
}
