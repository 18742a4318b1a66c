//! Post-processing: deterministic cleanup of model-generated Markdown.
//!
//! Two passes run over the model output at different times:
//!
//! 1. [`preprocess`] runs once, right after the generation call, before the
//!    text is stored. It turns bold-wrapped day titles into real headings and
//!    then turns *every other* bold span into a level-one heading too. That
//!    second step is lossy (legitimate bold text in the body becomes a
//!    heading) and is kept on purpose: the model overuses bold where it
//!    meant headings, and the rendered output depends on this conversion.
//!
//! 2. [`normalize`] runs whenever the stored itinerary is displayed. It is an
//!    ordered table of named rules ([`NORMALIZE_RULES`]) applied left to
//!    right. Order matters: the heading collapses (1, 2) must see the
//!    markers before rule 5 re-spaces them, and trimming comes last.
//!
//! ## Idempotence
//!
//! `normalize(normalize(m)) == normalize(m)` for every input. The rules that
//! look at line starts accept leading horizontal whitespace, so the final trim
//! cannot expose a new match, and no rule joins or splits lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named, pure `&str → String` transform.
pub struct Rule {
    pub name: &'static str,
    apply: fn(&str) -> String,
}

impl Rule {
    pub fn apply(&self, input: &str) -> String {
        (self.apply)(input)
    }
}

// ── Pre-pass ─────────────────────────────────────────────────────────────────

static RE_BOLD_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*#?\s*(Day\s*\d+)\*\*").unwrap());

static RE_BOLD_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// Convert bold-wrapped day titles and remaining bold spans to `#` headings.
///
/// ```rust
/// use wanderlens::pipeline::postprocess::preprocess;
///
/// assert_eq!(
///     preprocess("**Day 1**\nSome **bold** text"),
///     "# Day 1\nSome # bold text",
/// );
/// ```
pub fn preprocess(input: &str) -> String {
    let s = RE_BOLD_DAY.replace_all(input, "# $1");
    RE_BOLD_SPAN.replace_all(&s, "# $1").into_owned()
}

// ── Normalizer ───────────────────────────────────────────────────────────────

/// Normalization rules in evaluation order.
pub static NORMALIZE_RULES: [Rule; 6] = [
    Rule {
        name: "collapse-h1-h2",
        apply: collapse_h1_h2,
    },
    Rule {
        name: "collapse-h2-h1",
        apply: collapse_h2_h1,
    },
    Rule {
        name: "strip-heading-in-list-item",
        apply: strip_heading_in_list_item,
    },
    Rule {
        name: "collapse-blank-lines",
        apply: collapse_blank_lines,
    },
    Rule {
        name: "heading-marker-spacing",
        apply: heading_marker_spacing,
    },
    Rule {
        name: "trim",
        apply: trim,
    },
];

/// Apply every rule of [`NORMALIZE_RULES`] in order.
pub fn normalize(input: &str) -> String {
    NORMALIZE_RULES
        .iter()
        .fold(input.to_string(), |acc, rule| rule.apply(&acc))
}

// `[^\S\n]` is "whitespace other than a newline" throughout: it matches the
// same characters `str::trim` removes, minus line breaks.

// ── Rule 1: `# ##` → `##` ────────────────────────────────────────────────────

static RE_H1_H2: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<indent>[^\S\n]*)#[^\S\n]+##(?:[^\S\n]+#{1,2})*(?P<after>[^\S\n]|$)")
        .unwrap()
});

fn collapse_h1_h2(input: &str) -> String {
    RE_H1_H2.replace_all(input, "${indent}##${after}").into_owned()
}

// ── Rule 2: `## #` → `##` ────────────────────────────────────────────────────

static RE_H2_H1: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<indent>[^\S\n]*)##[^\S\n]+#(?:[^\S\n]+#{1,2})*(?P<after>[^\S\n]|$)")
        .unwrap()
});

fn collapse_h2_h1(input: &str) -> String {
    RE_H2_H1.replace_all(input, "${indent}##${after}").into_owned()
}

// ── Rule 3: `* # text` → `* text` ────────────────────────────────────────────
//
// The pre-pass turns `* **Tip:** …` into `* # Tip: …`; the heading markers
// are dropped so the line renders as the list item it was meant to be.

static RE_STAR_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<indent>[^\S\n]*)\*[^\S\n]*#+(?:[^\S\n]*#+)*[^\S\n]*").unwrap()
});

fn strip_heading_in_list_item(input: &str) -> String {
    RE_STAR_HEADING.replace_all(input, "${indent}* ").into_owned()
}

// ── Rule 4: Collapse 3+ newlines to 2 ────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

// ── Rule 5: Exactly one space after a heading marker ─────────────────────────

static RE_MARKER_SPACING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<indent>[^\S\n]*)(?P<marker>#+)[^\S\n]*(?P<first>[^#\s])").unwrap()
});

fn heading_marker_spacing(input: &str) -> String {
    RE_MARKER_SPACING
        .replace_all(input, "${indent}${marker} ${first}")
        .into_owned()
}

// ── Rule 6: Trim ─────────────────────────────────────────────────────────────

fn trim(input: &str) -> String {
    input.trim().to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_converts_bold_day() {
        assert_eq!(preprocess("**Day 1**"), "# Day 1");
        assert_eq!(preprocess("**# Day 2**"), "# Day 2");
        assert_eq!(preprocess("**#Day3**"), "# Day3");
    }

    #[test]
    fn test_preprocess_converts_all_bold_spans() {
        // Lossy on purpose: body bold becomes a heading marker too.
        assert_eq!(
            preprocess("**Day 1**\nSome **bold** text"),
            "# Day 1\nSome # bold text"
        );
        assert_eq!(
            preprocess("- Ramen - Ichiran - **¥1,200**"),
            "- Ramen - Ichiran - # ¥1,200"
        );
    }

    #[test]
    fn test_preprocess_does_not_span_lines() {
        let input = "**open\nclose**";
        assert_eq!(preprocess(input), input);
    }

    #[test]
    fn test_collapse_h1_h2() {
        assert_eq!(normalize("# ## Day 1"), "## Day 1");
        assert_eq!(collapse_h1_h2("# ## # Morning"), "## Morning");
        assert_eq!(collapse_h1_h2("  # ## Evening"), "  ## Evening");
    }

    #[test]
    fn test_real_h3_is_untouched() {
        assert_eq!(normalize("### Tips"), "### Tips");
        assert_eq!(normalize("## Morning"), "## Morning");
    }

    #[test]
    fn test_collapse_h2_h1() {
        assert_eq!(collapse_h2_h1("## # Afternoon"), "## Afternoon");
        assert_eq!(collapse_h2_h1("## # # Afternoon"), "## Afternoon");
        assert_eq!(normalize("## #"), "##");
    }

    #[test]
    fn test_strip_heading_in_list_item() {
        assert_eq!(strip_heading_in_list_item("* # Tip: carry cash"), "* Tip: carry cash");
        assert_eq!(strip_heading_in_list_item("*#Tip"), "* Tip");
        assert_eq!(strip_heading_in_list_item("  * ## # x"), "  * x");
        assert_eq!(strip_heading_in_list_item("* plain item"), "* plain item");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(normalize("A\n\n\n\nB"), "A\n\nB");
        assert_eq!(collapse_blank_lines("A\n\n\nB"), "A\n\nB");
        assert_eq!(collapse_blank_lines("A\n\nB"), "A\n\nB");
    }

    #[test]
    fn test_heading_marker_spacing() {
        assert_eq!(heading_marker_spacing("#Day 1"), "# Day 1");
        assert_eq!(heading_marker_spacing("##    Morning"), "## Morning");
        assert_eq!(heading_marker_spacing("# Day 1"), "# Day 1");
        assert_eq!(heading_marker_spacing("Room #5"), "Room #5");
    }

    #[test]
    fn test_trim() {
        assert_eq!(normalize("\n\n  # Day 1\n\n"), "# Day 1");
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<&str> = NORMALIZE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "collapse-h1-h2",
                "collapse-h2-h1",
                "strip-heading-in-list-item",
                "collapse-blank-lines",
                "heading-marker-spacing",
                "trim",
            ]
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let corpus = [
            "",
            "   ",
            "# ## Day 1",
            "## # Day 1",
            "# ## # ## Day 1\n## # # Morning",
            "# ## ### Day",
            "#Day 1\n##Morning\n###   Lunch",
            "* # Tip\n*#Tip\n  * ## # nested",
            "A\n\n\n\n\nB\n\n\nC",
            "  \t# ## Indented\n",
            "\u{a0}# ## Day 1\u{a0}",
            "# ##\u{a0}",
            "####### seven",
            "#\n#\n#",
            "Intro\n\n\n# ## Day 1\n\n\n\n## Morning (9:00 AM - 12:00 PM)\n- Temple - Asakusa - # ¥0\n\n\n\n## # Extra Remarks\n* # Carry cash\n",
            "| A | B |\n|---|---|\n| 1 | ~~2~~ |",
        ];
        for input in corpus {
            let once = normalize(input);
            let twice = normalize(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_full_pipeline_on_model_output() {
        let raw = "**Day 1**\n\n\n\n# ## Morning (9:00 AM - 12:00 PM)\n* **Tip:** buy a Suica card\n##Afternoon";
        let cleaned = normalize(&preprocess(raw));
        assert_eq!(
            cleaned,
            "# Day 1\n\n## Morning (9:00 AM - 12:00 PM)\n* Tip: buy a Suica card\n## Afternoon"
        );
    }
}
