use crate::models::{Candidate, ANY_YEAR, OPEN_TO_ALL};

/// Check whether two candidates satisfy each other's hard constraints
///
/// Rules are evaluated in order and the first failure short-circuits:
/// 1. Gender preference, both directions
/// 2. Both ages known
/// 3. Age preference, both directions
/// 4. Year preference, both directions
/// 5. Intent (either side open, or both the same)
///
/// The predicate is symmetric: `is_compatible(a, b) == is_compatible(b, a)`.
pub fn is_compatible(user1: &Candidate, user2: &Candidate) -> bool {
    if !accepts_gender(user1, user2) || !accepts_gender(user2, user1) {
        tracing::trace!(user1 = %user1.id, user2 = %user2.id, "gender preference mismatch");
        return false;
    }

    // Zero is how an unset age arrives from clients
    let (age1, age2) = match (known_age(user1), known_age(user2)) {
        (Some(age1), Some(age2)) => (age1, age2),
        _ => {
            tracing::trace!(user1 = %user1.id, user2 = %user2.id, "age missing");
            return false;
        }
    };

    if !user1.age_preference.accepts(age1, age2) || !user2.age_preference.accepts(age2, age1) {
        tracing::trace!(user1 = %user1.id, user2 = %user2.id, "age preference failed");
        return false;
    }

    if !accepts_year(&user1.year_preference, user2.year.as_deref())
        || !accepts_year(&user2.year_preference, user1.year.as_deref())
    {
        tracing::trace!(user1 = %user1.id, user2 = %user2.id, "year preference failed");
        return false;
    }

    if !intents_match(user1, user2) {
        tracing::trace!(user1 = %user1.id, user2 = %user2.id, "intent mismatch");
        return false;
    }

    true
}

/// Does `user` accept `other`'s gender?
///
/// A missing preference accepts nobody.
#[inline]
fn accepts_gender(user: &Candidate, other: &Candidate) -> bool {
    match user.gender_preference.as_deref() {
        Some(OPEN_TO_ALL) => true,
        Some(preference) => other.gender.as_deref() == Some(preference),
        None => false,
    }
}

#[inline]
fn known_age(user: &Candidate) -> Option<u32> {
    user.age.filter(|age| *age > 0)
}

#[inline]
fn accepts_year(preference: &[String], year: Option<&str>) -> bool {
    if preference.is_empty() || preference.iter().any(|y| y == ANY_YEAR) {
        return true;
    }

    year.map_or(false, |year| preference.iter().any(|y| y == year))
}

#[inline]
fn intents_match(user1: &Candidate, user2: &Candidate) -> bool {
    user1.opento.is_open() || user2.opento.is_open() || user1.opento == user2.opento
}
