//! Identifier arithmetic and the reproduction-token codec.
//!
//! Identifiers are arbitrary-precision because domain sizes grow as
//! products and factorials. Conventions shared by every factory:
//! - products are mixed radix with the first child as the least
//!   significant digit;
//! - unions give each branch a consecutive range, in branch order.
//!
//! A reproduction token is the plain base-10 rendering of an identifier.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::FactoryError;
use crate::factory::Factory;

/// Product of the given sizes (1 for an empty slice).
pub fn product(sizes: &[BigUint]) -> BigUint {
    sizes.iter().fold(BigUint::one(), |acc, size| acc * size)
}

/// Split an identifier into one digit per radix, least significant first.
///
/// Returns the digits and whatever quotient is left above the last radix.
pub fn split_mixed_radix(identifier: &BigUint, radices: &[BigUint]) -> (Vec<BigUint>, BigUint) {
    let mut rest = identifier.clone();
    let mut digits = Vec::with_capacity(radices.len());
    for radix in radices {
        digits.push(&rest % radix);
        rest /= radix;
    }
    (digits, rest)
}

/// Inverse of [`split_mixed_radix`].
pub fn join_mixed_radix(digits: &[BigUint], radices: &[BigUint], high: &BigUint) -> BigUint {
    let mut identifier = high.clone();
    for (digit, radix) in digits.iter().zip(radices).rev() {
        identifier = identifier * radix + digit;
    }
    identifier
}

/// Start offset of every branch plus the total size.
pub fn branch_offsets(sizes: &[BigUint]) -> (Vec<BigUint>, BigUint) {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut total = BigUint::zero();
    for size in sizes {
        offsets.push(total.clone());
        total += size;
    }
    (offsets, total)
}

/// Find the branch whose range contains `identifier`, and the branch-local identifier.
pub fn locate_branch(
    identifier: &BigUint,
    offsets: &[BigUint],
    total: &BigUint,
) -> Option<(usize, BigUint)> {
    if identifier >= total || offsets.is_empty() {
        return None;
    }
    let branch = offsets.partition_point(|offset| offset <= identifier) - 1;
    Some((branch, identifier - &offsets[branch]))
}

/// Render an identifier as a reproduction token.
pub fn serialize(identifier: &BigUint) -> String {
    identifier.to_str_radix(10)
}

/// Parse a reproduction token.
///
/// Only ASCII digits are accepted: no sign, whitespace or separators.
pub fn deserialize(token: &str) -> Result<BigUint, FactoryError> {
    if token.is_empty() {
        return Err(malformed(token, "token is empty"));
    }
    if let Some(bad) = token.chars().find(|c| !c.is_ascii_digit()) {
        return Err(malformed(token, &format!("unexpected character {bad:?}")));
    }
    BigUint::parse_bytes(token.as_bytes(), 10)
        .ok_or_else(|| malformed(token, "not a base-10 integer"))
}

/// Decode a token and build the single case it names.
///
/// A token that parses but lies outside the factory's domain (for
/// instance because the tree changed since it was recorded) is reported
/// as malformed, never truncated.
pub fn case_from_token<F>(factory: &F, token: &str) -> Result<F::Case, FactoryError>
where
    F: Factory + ?Sized,
{
    let identifier = deserialize(token)?;
    let size = factory.size();
    if identifier >= size {
        return Err(malformed(
            token,
            &format!("identifier is out of range for a domain of size {size}"),
        ));
    }
    factory.case_at(&identifier)
}

fn malformed(token: &str, reason: &str) -> FactoryError {
    FactoryError::MalformedToken {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}
