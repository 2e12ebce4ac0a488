use anyhow::{Context, Result};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds; negative literals are folded to their magnitude.
pub fn parse_seeds(raw: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in split_csv(raw) {
        if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
            continue;
        }
        let value = token
            .parse::<u64>()
            .with_context(|| format!("invalid seed `{token}`"))?;
        seeds.push(value);
    }
    if seeds.is_empty() {
        anyhow::bail!("no seeds supplied");
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn parse_seeds_accepts_signed_and_large_values() {
        let seeds = parse_seeds("1337, -5, 18446744073709551615").unwrap();
        assert_eq!(seeds, vec![1337, 5, u64::MAX]);
    }

    #[test]
    fn parse_seeds_rejects_garbage() {
        assert!(parse_seeds("12,banana").is_err());
        assert!(parse_seeds(" , ").is_err());
    }
}
