//! Input validation for grouping problems.
//!
//! Checks structural integrity of participants and sessions before a run
//! and reports every problem found, not just the first. Detects:
//! - Duplicate participant IDs
//! - Sessions without groups or with `min_size > max_size`
//! - Sessions that cannot hold the roster (`G·min > N` or `G·max < N`)
//! - Explicit rank targets that do not match the group count, the size
//!   bounds, or the roster's rank totals
//!
//! [`Roster::new`](crate::Roster::new) fails fast on the first
//! infeasibility; this module is for loaders that want a full report.

use std::collections::HashSet;

use crate::models::{Participant, Rank, RankCounts, Session};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two participants share the same ID.
    DuplicateId,
    /// No participants or no sessions.
    EmptyInput,
    /// A session has zero groups.
    NoGroups,
    /// A session has `min_size > max_size`.
    InvertedBounds,
    /// A session cannot hold the roster.
    InfeasibleCapacity,
    /// Explicit rank targets are inconsistent.
    RankTargetMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input of a grouping problem.
///
/// Checks:
/// 1. At least one participant and one session
/// 2. No duplicate participant IDs
/// 3. Every session has groups and `min_size <= max_size`
/// 4. Every session can hold all participants
/// 5. Explicit rank targets have one entry per group, group totals within
///    bounds, and per-rank sums equal to the roster's rank totals
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(participants: &[Participant], sessions: &[Session]) -> ValidationResult {
    let mut errors = Vec::new();
    let n = participants.len();

    if n == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "No participants",
        ));
    }
    if sessions.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "No sessions",
        ));
    }

    let mut ids = HashSet::new();
    for p in participants {
        if !ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate participant ID: {}", p.id),
            ));
        }
    }

    let totals = RankCounts::from_pairs(participants.iter().map(|p| (p.rank, 1)));

    for (s, session) in sessions.iter().enumerate() {
        if session.group_count == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoGroups,
                format!("Session {s} has no groups"),
            ));
            continue;
        }
        if session.min_size > session.max_size {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedBounds,
                format!(
                    "Session {s}: min size {} exceeds max size {}",
                    session.min_size, session.max_size
                ),
            ));
            continue;
        }
        if n > 0 && !session.can_hold(n) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InfeasibleCapacity,
                format!(
                    "Session {s}: {n} participants do not fit {} groups of {}..={}",
                    session.group_count, session.min_size, session.max_size
                ),
            ));
        }
        if let Some(targets) = &session.rank_targets {
            check_rank_targets(s, session, targets, totals, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rank_targets(
    s: usize,
    session: &Session,
    targets: &[RankCounts],
    totals: RankCounts,
    errors: &mut Vec<ValidationError>,
) {
    if targets.len() != session.group_count {
        errors.push(ValidationError::new(
            ValidationErrorKind::RankTargetMismatch,
            format!(
                "Session {s}: {} rank targets for {} groups",
                targets.len(),
                session.group_count
            ),
        ));
        return;
    }

    for (g, target) in targets.iter().enumerate() {
        if !session.size_ok(target.total()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::RankTargetMismatch,
                format!(
                    "Session {s}, group {g}: target size {} outside {}..={}",
                    target.total(),
                    session.min_size,
                    session.max_size
                ),
            ));
        }
    }

    for rank in Rank::ALL {
        let sum: usize = targets.iter().map(|t| t[rank]).sum();
        if sum != totals[rank] {
            errors.push(ValidationError::new(
                ValidationErrorKind::RankTargetMismatch,
                format!(
                    "Session {s}: targets place {sum} {rank} participants, roster has {}",
                    totals[rank]
                ),
            ));
        }
    }
}
