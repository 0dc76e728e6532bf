use anyhow::{ensure, Result};
use proc_thompson_dfa::dfa;
use regex::Regex;
use std::hint::black_box;
use std::time::{Duration, Instant};
use thompson_dfa_transformer::compile;

/// Third symbol from the end is a 1. Must match the `dfa!` literal below.
const EXPRESSION: &str = "(0|1)*1(0|1)(0|1)";

const TEST_SUIT: [&str; 5] = ["100", "0110", "1", "0001011", "10101010101"];

const fn table_implementation(to_test: &str) -> bool {
    dfa!("(0|1)*1(0|1)(0|1)").test(to_test)
}

fn time(label: &str, runs: usize, f: impl Fn(&str) -> bool) {
    let start = Instant::now();
    for x in 0..runs {
        let i = x % TEST_SUIT.len();
        black_box(f(black_box(TEST_SUIT[i])));
    }
    let elapsed = start.elapsed();
    println!("{label:<16}: {elapsed:?} | {:?} per request", per_request(elapsed, runs));
}

fn per_request(elapsed: Duration, runs: usize) -> Duration {
    elapsed.div_f64(runs.max(1) as f64)
}

pub fn run(runs: usize) -> Result<()> {
    let compiled = compile(EXPRESSION)?;
    let re = Regex::new(&format!("^(?:{EXPRESSION})$"))?;

    for word in TEST_SUIT {
        let expected = re.is_match(word);
        ensure!(
            table_implementation(word) == expected && compiled.check_word(word) == expected,
            "implementations disagree on `{word}`"
        );
    }

    time("dfa! table", runs, table_implementation);
    time("runtime DFA", runs, |w| compiled.check_word(w));
    time("regex crate", runs, |w| re.is_match(w));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_request_average() {
        assert_eq!(per_request(Duration::from_secs(10), 10), Duration::from_secs(1));
        assert_eq!(per_request(Duration::from_secs(10), 0), Duration::from_secs(10));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn per_request_survives_huge_run_counts() {
        let runs = 1usize << 32;
        assert!(per_request(Duration::from_secs(1), runs) < Duration::from_micros(1));
    }

    #[test]
    fn implementations_agree_on_suite() {
        assert!(run(0).is_ok());
    }
}
