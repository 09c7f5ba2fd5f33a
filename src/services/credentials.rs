// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing and verification.
//!
//! Stand-alone functions over a stored hash and a candidate plaintext; the
//! user record itself carries no behavior. bcrypt is CPU-bound, so both
//! operations run on the blocking pool.

use crate::error::AppError;
use anyhow::Context;
use tokio::sync::OnceCell;

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Hash a plaintext password with a fresh salt.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .context("Password hashing failed")?;
    Ok(hashed)
}

/// Check a candidate plaintext against a stored hash.
///
/// A malformed stored hash counts as a mismatch rather than an error, so the
/// caller's response is the same as for a wrong password.
pub async fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, AppError> {
    let candidate = candidate.to_string();
    let stored_hash = stored_hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &stored_hash))
        .await
        .context("Password verification task failed")?;

    match verified {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            Ok(false)
        }
    }
}

/// Stand-in hash verified when a login names no known account.
///
/// Hashed once, lazily, at the configured cost so an unknown email costs the
/// same bcrypt work as a wrong password.
pub struct DecoyHash {
    cost: u32,
    hash: OnceCell<String>,
}

impl DecoyHash {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            hash: OnceCell::new(),
        }
    }

    /// Verify `candidate` against the decoy. Always a mismatch.
    pub async fn verify(&self, candidate: &str) -> Result<bool, AppError> {
        let hash = self
            .hash
            .get_or_try_init(|| hash_password(DECOY_PASSWORD, self.cost))
            .await?;
        verify_password(candidate, hash).await?;
        Ok(false)
    }
}
