use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitRule {
    const fn new(per_second: u64, burst_size: u32) -> Self {
        Self {
            per_second,
            burst_size,
        }
    }
}

/// Per-group rate limits: unauthenticated intake (register/login/reports),
/// public reads, and authenticated writes.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub intake: RateLimitRule,
    pub public_read: RateLimitRule,
    pub protected: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intake: RateLimitRule::new(5, 10),
            public_read: RateLimitRule::new(30, 60),
            protected: RateLimitRule::new(10, 20),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(value) = env::var("RATE_LIMIT_ENABLED") {
            cfg.enabled = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        cfg.intake = rule_from_env("RATE_LIMIT_INTAKE", cfg.intake);
        cfg.public_read = rule_from_env("RATE_LIMIT_PUBLIC", cfg.public_read);
        cfg.protected = rule_from_env("RATE_LIMIT_PROTECTED", cfg.protected);

        cfg
    }
}

fn rule_from_env(var_name: &str, default: RateLimitRule) -> RateLimitRule {
    let Ok(raw) = env::var(var_name) else {
        return default;
    };

    match parse_rule(&raw) {
        Ok(rule) => rule,
        Err(err) => {
            tracing::warn!("Invalid {} '{}': {}", var_name, raw, err);
            default
        }
    }
}

/// Parse a "per_second:burst" pair, e.g. "30:60".
fn parse_rule(raw: &str) -> Result<RateLimitRule, String> {
    let (per_second_raw, burst_raw) = raw
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("invalid rule '{}', expected per:burst", raw))?;

    let per_second: u64 = per_second_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid per_second '{}'", per_second_raw.trim()))?;
    let burst_size: u32 = burst_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid burst_size '{}'", burst_raw.trim()))?;

    if per_second == 0 || burst_size == 0 {
        return Err("per_second and burst_size must be > 0".to_string());
    }

    Ok(RateLimitRule::new(per_second, burst_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_rule() {
        assert_eq!(parse_rule("12:24").unwrap(), RateLimitRule::new(12, 24));
    }

    #[test]
    fn parse_rejects_zero() {
        assert!(parse_rule("0:10").is_err());
        assert!(parse_rule("10:0").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_rule("abc").is_err());
        assert!(parse_rule("a:b").is_err());
    }
}
