use num::Float;

/// Arithmetic mean. Empty input yields zero.
#[inline]
pub fn mean<N: Float>(values: &[N]) -> N {
    if values.is_empty() {
        return N::zero();
    }
    let sum = values.iter().fold(N::zero(), |acc, &v| acc + v);
    sum / len_as::<N>(values.len())
}

/// Population standard deviation (divides by n, not n - 1).
#[inline]
pub fn std_dev<N: Float>(values: &[N]) -> N {
    if values.len() < 2 {
        return N::zero();
    }
    let m = mean(values);
    let var = values
        .iter()
        .fold(N::zero(), |acc, &v| acc + (v - m) * (v - m))
        / len_as::<N>(values.len());
    var.sqrt()
}

/// Median of the values. Even-length input averages the two middle values.
/// NaN sorts last and is otherwise treated like any other value.
pub fn median<N: Float>(values: &[N]) -> N {
    if values.is_empty() {
        return N::zero();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Greater));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / (N::one() + N::one())
    } else {
        sorted[mid]
    }
}

/// Euclidean norm
#[inline]
pub fn l2_norm<N: Float>(values: &[N]) -> N {
    values.iter().fold(N::zero(), |acc, &v| acc + v * v).sqrt()
}

#[inline]
fn len_as<N: Float>(len: usize) -> N {
    N::from(len).unwrap_or_else(N::one)
}
