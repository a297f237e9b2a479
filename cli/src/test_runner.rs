use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use matcher::MatchExpression;

const TEST_SUFFIX: &str = ".test.shape";

/// One input the expression is evaluated against.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    /// Value in notation, e.g. `"[1, 2, 3]"`.
    pub input: String,

    /// Expected result in notation. Bindings compare as a tuple, test mode as
    /// `true`/`false`.
    #[serde(default)]
    pub expect: Option<String>,

    /// Evaluation must fail with an error whose Display contains this.
    #[serde(default)]
    pub expect_error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// The expression itself must fail to parse with a message containing
    /// this. An empty string accepts any parse error.
    #[serde(default)]
    pub expect_parse_error: Option<String>,

    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Split a `.test.shape` file into its TOML frontmatter and expression source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let source = after_open[close_pos + 4..].trim();

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

/// Evaluate one case. Returns `Some(reason)` on failure.
fn check_case(expression: &MatchExpression, case: &TestCase) -> Option<String> {
    let input = match shape::parse_value(&case.input) {
        Ok(value) => value,
        Err(e) => return Some(format!("bad input `{}`: {}", case.input, e)),
    };

    let result = expression.evaluate(&input);

    match (&case.expect_error, &case.expect, result) {
        (Some(expected_err), _, Err(err)) => {
            let err_str = err.to_string();
            if err_str.contains(expected_err.as_str()) {
                None
            } else {
                Some(format!(
                    "expected error containing \"{}\", got: {}",
                    expected_err, err_str
                ))
            }
        }
        (Some(expected_err), _, Ok(evaluation)) => Some(format!(
            "expected error containing \"{}\", got result {}",
            expected_err, evaluation
        )),
        (None, Some(expected), Ok(evaluation)) => {
            let expected_value = match shape::parse_value(expected) {
                Ok(value) => value,
                Err(e) => return Some(format!("bad expectation `{}`: {}", expected, e)),
            };
            let actual = evaluation.into_value();
            if actual == expected_value {
                None
            } else {
                Some(format!(
                    "result mismatch\n  expected: {}\n  actual:   {}",
                    expected_value, actual
                ))
            }
        }
        (None, _, Err(err)) => Some(format!("unexpected error: {}", err)),
        (None, None, Ok(_)) => None,
    }
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(TEST_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    tracing::debug!(path = %path.display(), "running test file");

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();

    let parse_result = shape::parse_chain(source);
    if let Some(expected) = &config.expect_parse_error {
        return match parse_result {
            Err(e) if e.message.contains(expected.as_str()) => TestResult {
                path: path.to_path_buf(),
                description,
                outcome: TestOutcome::Pass,
            },
            Err(e) => fail(
                description,
                format!("expected parse error containing \"{}\", got: {}", expected, e),
            ),
            Ok(_) => fail(description, "expected parse error, but parsing succeeded".into()),
        };
    }

    let expression = match parse_result.map(MatchExpression::from_chain) {
        Ok(Some(expression)) => expression,
        Ok(None) => return fail(description, "expression has no alternatives".into()),
        Err(e) => return fail(description, format!("unexpected parse error: {}", e)),
    };

    let failures: Vec<String> = config
        .cases
        .iter()
        .enumerate()
        .filter_map(|(i, case)| {
            check_case(&expression, case)
                .map(|reason| format!("case {} (input {}): {}", i, case.input, reason))
        })
        .collect();

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: if failures.is_empty() {
            TestOutcome::Pass
        } else {
            TestOutcome::Fail(failures.join("\n"))
        },
    }
}

/// Discover test files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(TEST_SUFFIX) {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(cat), files.len());
    }
}

/// ANSI styling that collapses to plain text under `--no-color`.
struct Style {
    no_color: bool,
}

impl Style {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        }
    }

    fn pass(&self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(&self) -> String {
        self.paint("31", "FAIL")
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }
}

fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a Vec<PathBuf>> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }

    let mut selected = BTreeMap::new();
    for request in requested {
        let req = request.trim_matches('/');
        let nested = format!("{}/", req);
        let mut found = false;
        for (cat, files) in all {
            if cat == req || cat.starts_with(&nested) {
                selected.insert(cat.as_str(), files);
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    selected
}

/// Run every test file under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let style = Style { no_color };

    let groups: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all_categories = discover_categorized(path);
        if all_categories.is_empty() {
            eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
            return 1;
        }
        let selected = select_categories(&all_categories, categories);
        if selected.is_empty() {
            eprintln!("no matching categories found");
            return 1;
        }
        selected
            .into_iter()
            .map(|(cat, files)| (cat.to_string(), files.clone()))
            .collect()
    };

    let single = path.is_file();
    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &groups {
        if !single {
            eprintln!();
            eprintln!("{}", style.bold(category_label(cat)));
        }

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", style.pass(), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", style.fail(), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        eprintln!("test result: {}. {} passed, 0 failed", style.paint("32", "ok"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            style.paint("31", "FAILED"),
            passed,
            failed,
            passed + failed
        );
        1
    }
}
