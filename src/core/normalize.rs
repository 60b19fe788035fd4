/// Characters that exports and uploads disagree on. Each occurrence becomes `_`.
const REPLACED_CHARS: [char; 7] = [
    '\u{2018}', // ‘
    '\u{2019}', // ’
    '\u{201C}', // “
    '\u{201D}', // ”
    '\'',
    '`',
    '?',
];

const PDF_EXT: &str = ".pdf";
const DOUBLE_PDF_EXT: &str = ".pdf.pdf";

const BOM: char = '\u{FEFF}';

fn trim_blank(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == BOM)
}

/// Empty after trimming whitespace and BOMs; such cells carry no filename.
pub fn is_blank(raw: &str) -> bool {
    trim_blank(raw).is_empty()
}

/// Canonical comparison key for a filename.
///
/// Trims (a stray BOM counts as whitespace) and lowercases, replaces inner
/// whitespace, quote variants, backticks and `?` with `_` one-for-one,
/// collapses a doubled `.pdf.pdf` suffix and finally makes sure the key ends
/// in `.pdf`. Total over all inputs: `""` becomes `".pdf"`.
pub fn normalize(raw: &str) -> String {
    let mut key: String = trim_blank(raw)
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() || REPLACED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    // 反覆收斂，`a.pdf.pdf.pdf` 也要得到同一個 key
    while key.ends_with(DOUBLE_PDF_EXT) {
        key.truncate(key.len() - PDF_EXT.len());
    }

    if !key.ends_with(PDF_EXT) {
        key.push_str(PDF_EXT);
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_extension() {
        assert_eq!(normalize("Report.PDF"), "report.pdf");
    }

    #[test]
    fn test_replaces_smart_quotes_and_question_marks() {
        assert_eq!(normalize("Smith\u{2019}s Study?.pdf"), "smith_s_study_.pdf");
        assert_eq!(
            normalize("\u{201C}Quoted\u{201D} \u{2018}title\u{2019}.pdf"),
            "_quoted___title_.pdf"
        );
        assert_eq!(normalize("o'brien `draft`.pdf"), "o_brien__draft_.pdf");
    }

    #[test]
    fn test_consecutive_replacements_are_not_collapsed() {
        assert_eq!(normalize("why??.pdf"), "why__.pdf");
        assert_eq!(normalize("it\u{2019}'s"), "it__s.pdf");
    }

    #[test]
    fn test_collapses_doubled_extension() {
        assert_eq!(normalize("paper.pdf.pdf"), "paper.pdf");
        assert_eq!(normalize("Paper.PDF.pdf"), "paper.pdf");
        assert_eq!(normalize("paper.pdf.pdf.pdf"), "paper.pdf");
    }

    #[test]
    fn test_appends_missing_extension() {
        assert_eq!(normalize("notes"), "notes.pdf");
        assert_eq!(normalize("table.csv"), "table.csv.pdf");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize("  Spaced Out.pdf \t\n"), "spaced_out.pdf");
    }

    #[test]
    fn test_inner_whitespace_replaced_one_per_char() {
        assert_eq!(normalize("a b.pdf"), "a_b.pdf");
        assert_eq!(normalize("a  b\tc.pdf"), "a__b_c.pdf");
    }

    #[test]
    fn test_strips_leading_bom() {
        assert_eq!(normalize("\u{FEFF}a.pdf"), "a.pdf");
        assert_eq!(normalize("\u{FEFF} A.PDF "), "a.pdf");
    }

    #[test]
    fn test_replacement_happens_before_collapse() {
        assert_eq!(normalize("X?.PDF.PDF"), "x_.pdf");
        assert_eq!(normalize("  Why Not?.pdf.pdf  "), "why_not_.pdf");
    }

    #[test]
    fn test_empty_input_becomes_bare_extension() {
        assert_eq!(normalize(""), ".pdf");
        assert_eq!(normalize("   "), ".pdf");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "Report.PDF",
            "Smith\u{2019}s Study?.pdf",
            "paper.pdf.pdf",
            "paper.pdf.pdf.pdf",
            "notes",
            ".pdf",
            ".pdf.pdf",
            "  Mixed CASE `ticks` \u{201C}x\u{201D}.Pdf.PDF  ",
            "ümlaut – dash.pdf",
            "trailing dot.",
            "?",
            "\u{FEFF}a b.pdf",
            "a \u{FEFF}b",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
