// Sample test program built on trellis.
// Usage: cargo run --bin trellis-demo -- [--list | --json] [conditions...]
//
// The `broken` suite fails on purpose, so a full run exits with status 3.

use std::process::ExitCode;

use once_cell::sync::Lazy;
use trellis::prelude::*;

static ALL: Lazy<Test> = Lazy::new(|| Test::suite("all", [numbers(), text(), stack(), broken()]));

fn numbers() -> Test {
    Test::suite(
        "numbers",
        [
            Test::case("checked_add", |t| {
                ensure!(t, 2u8.checked_add(3) == Some(5));
                ensure!(t, 250u8.checked_add(10).is_none());
                Ok(())
            }),
            Test::case("parse_int", |t| {
                verify!(t, "42".parse::<i32>() == Ok(42));
                verify!(t, "-7".parse::<i32>() == Ok(-7));
                ensure!(t, "4x".parse::<i32>().is_err());
                Ok(())
            }),
        ],
    )
}

fn text() -> Test {
    Test::suite(
        "text",
        [
            Test::case("split_words", |t| {
                let words: Vec<&str> = "a bb  ccc".split_whitespace().collect();
                ensure!(t, words.len() == 3, "got {:?}", words);
                verify!(t, words[2] == "ccc");
                Ok(())
            }),
            Test::case("uppercase", |t| {
                verify!(t, "trellis".to_uppercase() == "TRELLIS");
                Ok(())
            })
            .with_tag("fast"),
        ],
    )
}

/// Seeds every case with a three-element stack.
struct SeededStack;

impl Fixture for SeededStack {
    type Context = Vec<i32>;

    fn name(&self) -> &str {
        "seeded_stack"
    }

    fn setup(&self, _t: &mut Checker<'_>, stack: &mut Vec<i32>) -> Outcome {
        stack.extend([1, 2, 3]);
        Ok(())
    }

    fn teardown(&self, _fails: usize, stack: &mut Vec<i32>) {
        stack.clear();
    }
}

fn stack() -> Test {
    Test::suite(
        "stack",
        [
            Test::case_with("pop_order", SeededStack, |t, stack| {
                ensure!(t, stack.pop() == Some(3));
                ensure!(t, stack.pop() == Some(2));
                Ok(())
            }),
            Test::case_with("push_grows", SeededStack, |t, stack| {
                stack.push(4);
                ensure!(t, stack.len() == 4);
                Ok(())
            }),
        ],
    )
}

fn broken() -> Test {
    Test::suite(
        "broken",
        [
            Test::case("bad_sum", |t| {
                let sum: i32 = [1, 2, 3].iter().sum();
                ensure!(t, sum == 7, "sum was {}", sum);
                Ok(())
            }),
            Test::case("two_verifies", |t| {
                verify!(t, "abc".len() == 4);
                verify!(t, "abc".starts_with('b'));
                Ok(())
            }),
        ],
    )
    .with_tag("broken")
}

fn main() -> ExitCode {
    trellis::cli::run(&ALL)
}
