//! Inner ring membership checks.

use neofs_primitives::PublicKey;

use crate::context::ExecutionContext;
use crate::error::{ContractError, ContractResult};

/// First authority in `authorities` that signed the invocation.
pub fn invoker(ctx: &ExecutionContext<'_>, authorities: &[PublicKey]) -> Option<PublicKey> {
    authorities
        .iter()
        .find(|key| ctx.check_witness(key))
        .copied()
}

/// Like [`invoker`], considering only the first `limit` authorities.
pub fn invoker_within(
    ctx: &ExecutionContext<'_>,
    authorities: &[PublicKey],
    limit: usize,
) -> Option<PublicKey> {
    invoker(ctx, &authorities[..limit.min(authorities.len())])
}

/// Resolves the voting authority of the invocation or refuses it.
pub fn authorize(
    ctx: &ExecutionContext<'_>,
    authorities: &[PublicKey],
    method: &'static str,
) -> ContractResult<PublicKey> {
    invoker(ctx, authorities).ok_or(ContractError::NotAuthority { method })
}

/// Validates a proposed authority list.
pub fn validate(keys: &[PublicKey], method: &'static str) -> ContractResult<()> {
    if keys.is_empty() {
        return Err(ContractError::invalid_argument(method, "empty inner ring"));
    }
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].contains(key) {
            return Err(ContractError::invalid_argument(
                method,
                format!("duplicate inner ring key {key}"),
            ));
        }
    }
    Ok(())
}
