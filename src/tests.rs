pub(crate) type TestDtype = f32;

pub(crate) const DEFAULT_RTOL: f64 = 1e-5;
pub(crate) const DEFAULT_ATOL: f64 = 1e-8;

pub(crate) fn assert_all_close<T>(lhs: &[T], rhs: &[T])
where
    T: Copy + Into<f64> + std::fmt::Debug,
{
    assert_eq!(lhs.len(), rhs.len(), "{lhs:?} vs {rhs:?}");
    for (i, (a, b)) in lhs.iter().zip(rhs.iter()).enumerate() {
        let (a, b): (f64, f64) = ((*a).into(), (*b).into());
        if a == b || (a.is_nan() && b.is_nan()) {
            continue;
        }
        assert!(
            (a - b).abs() <= DEFAULT_ATOL + DEFAULT_RTOL * b.abs(),
            "lhs[{i}]={a} not close to rhs[{i}]={b}"
        );
    }
}
