//! Document-type inference from keyword frequencies.

use once_cell::sync::Lazy;

use crate::model::DocumentType;

static ACADEMIC_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "abstract",
        "introduction",
        "methodology",
        "results",
        "conclusion",
        "references",
        "bibliography",
    ]
});

static BUSINESS_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "executive summary",
        "proposal",
        "budget",
        "quarterly",
        "revenue",
        "strategy",
    ]
});

static LEGAL_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "whereas",
        "hereby",
        "plaintiff",
        "defendant",
        "contract",
        "agreement",
    ]
});

/// Score one keyword set: +1 per keyword present anywhere in the text.
fn score(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Infer the document type from the full document text.
///
/// Priority order: academic (≥3 hits) > business (≥2) > legal (≥2) >
/// general.
pub fn detect_document_type(full_text: &str) -> DocumentType {
    let text = full_text.to_lowercase();

    if score(&text, &ACADEMIC_KEYWORDS) >= 3 {
        return DocumentType::Academic;
    }
    if score(&text, &BUSINESS_KEYWORDS) >= 2 {
        return DocumentType::Business;
    }
    if score(&text, &LEGAL_KEYWORDS) >= 2 {
        return DocumentType::Legal;
    }
    DocumentType::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_needs_three_hits() {
        let text = "Abstract. Introduction. Methodology follows.";
        assert_eq!(detect_document_type(text), DocumentType::Academic);

        let text = "Abstract and introduction only.";
        assert_eq!(detect_document_type(text), DocumentType::General);
    }

    #[test]
    fn test_business() {
        let text = "Quarterly revenue exceeded projections.";
        assert_eq!(detect_document_type(text), DocumentType::Business);
    }

    #[test]
    fn test_legal() {
        let text = "WHEREAS the parties hereby agree.";
        assert_eq!(detect_document_type(text), DocumentType::Legal);
    }

    #[test]
    fn test_academic_outranks_business() {
        let text =
            "Abstract. Introduction. Results. Conclusion. Budget and revenue discussion.";
        assert_eq!(detect_document_type(text), DocumentType::Academic);
    }

    #[test]
    fn test_general_fallback() {
        let text = "A plain story about nothing in particular.";
        assert_eq!(detect_document_type(text), DocumentType::General);
    }
}
