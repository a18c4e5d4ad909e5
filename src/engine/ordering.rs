use ethers::types::Address;

/// Whether the pair already satisfies canonical pool order, token0 being the
/// numerically smaller address under unsigned byte comparison.
pub fn in_canonical_order(a: Address, b: Address) -> bool {
    a <= b
}

/// Orders a token pair and its paired values canonically. Works for any
/// per-token payload (amounts, desired values).
pub fn sort_canonical<T>(a: Address, b: Address, value_a: T, value_b: T) -> (Address, Address, T, T) {
    if in_canonical_order(a, b) {
        (a, b, value_a, value_b)
    } else {
        (b, a, value_b, value_a)
    }
}
