//! Expiry arithmetic shared by the value families. All inputs are
//! milliseconds, a negative lifespan / max idle means "never".

pub(crate) fn is_expired_mortal(lifespan: i64, created: i64, now: i64) -> bool {
    lifespan > -1 && created > -1 && now > created.saturating_add(lifespan)
}

pub(crate) fn is_expired_transient(max_idle: i64, last_used: i64, now: i64) -> bool {
    max_idle > -1 && last_used > -1 && now > last_used.saturating_add(max_idle)
}

pub(crate) fn is_expired_transient_mortal(
    max_idle: i64,
    last_used: i64,
    lifespan: i64,
    created: i64,
    now: i64,
) -> bool {
    is_expired_transient(max_idle, last_used, now) || is_expired_mortal(lifespan, created, now)
}

pub(crate) fn mortal_expiry_time(created: i64, lifespan: i64) -> i64 {
    if lifespan > -1 && created > -1 {
        created.saturating_add(lifespan)
    } else {
        -1
    }
}

pub(crate) fn transient_expiry_time(last_used: i64, max_idle: i64) -> i64 {
    if max_idle > -1 && last_used > -1 {
        last_used.saturating_add(max_idle)
    } else {
        -1
    }
}

/// Earliest of the two deadlines, ignoring the undefined one.
pub(crate) fn transient_mortal_expiry_time(
    created: i64,
    lifespan: i64,
    last_used: i64,
    max_idle: i64,
) -> i64 {
    match (
        mortal_expiry_time(created, lifespan),
        transient_expiry_time(last_used, max_idle),
    ) {
        (-1, idle) => idle,
        (life, -1) => life,
        (life, idle) => life.min(idle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mortal_expiry_boundary() {
        assert!(!is_expired_mortal(100, 1_000, 1_100));
        assert!(is_expired_mortal(100, 1_000, 1_101));
        assert!(!is_expired_mortal(-1, 1_000, i64::MAX));
        assert!(!is_expired_mortal(100, -1, i64::MAX));
        assert_eq!(mortal_expiry_time(1_000, 100), 1_100);
        assert_eq!(mortal_expiry_time(1_000, -1), -1);
    }

    #[test]
    fn test_transient_expiry_boundary() {
        assert!(!is_expired_transient(50, 200, 250));
        assert!(is_expired_transient(50, 200, 251));
        assert!(!is_expired_transient(-1, 200, i64::MAX));
        assert_eq!(transient_expiry_time(200, 50), 250);
        assert_eq!(transient_expiry_time(-1, 50), -1);
    }

    #[test]
    fn test_transient_mortal_takes_earliest_deadline() {
        assert_eq!(transient_mortal_expiry_time(0, 1_000, 900, 50), 950);
        assert_eq!(transient_mortal_expiry_time(0, 1_000, 900, -1), 1_000);
        assert_eq!(transient_mortal_expiry_time(0, -1, 900, 50), 950);
        assert_eq!(transient_mortal_expiry_time(0, -1, 900, -1), -1);
        assert!(is_expired_transient_mortal(50, 900, 1_000, 0, 951));
        assert!(is_expired_transient_mortal(-1, 900, 1_000, 0, 1_001));
        assert!(!is_expired_transient_mortal(-1, 900, -1, 0, i64::MAX));
    }

    #[test]
    fn test_saturating_deadline() {
        assert!(!is_expired_mortal(i64::MAX, 10, i64::MAX));
        assert_eq!(mortal_expiry_time(10, i64::MAX), i64::MAX);
    }
}
