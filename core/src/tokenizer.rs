use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use scraper::{Html, Node};
use unicode_normalization::UnicodeNormalization;

/// Weight of a token occurrence outside any recognized tag.
pub const DEFAULT_WEIGHT: u32 = 1;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[a-z0-9]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Importance of a recognized tag, or `None` for tags carrying no boost.
fn tag_weight(tag: &str) -> Option<u32> {
    let weight = match tag {
        "title" => 10,
        "h1" => 7,
        "h2" => 6,
        "h3" => 5,
        "h4" => 4,
        "h5" => 3,
        "h6" => 2,
        "b" | "strong" => 2,
        _ => return None,
    };
    Some(weight)
}

/// Tokenize plain text into `(stem, weight)` pairs using NFKC normalization,
/// lowercasing, an ascii-alphanumeric word scan, and stemming. Everything
/// outside `[a-z0-9]` separates tokens. Every token carries the default
/// weight; queries go through this path.
pub fn tokenize(text: &str) -> Vec<(String, u32)> {
    scan(text, DEFAULT_WEIGHT)
}

fn scan(text: &str, weight: u32) -> Vec<(String, u32)> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&normalized)
        .map(|m| (STEMMER.stem(m.as_str()).to_string(), weight))
        .collect()
}

/// Tokenize an HTML document, yielding `(stem, weight)` in document order.
///
/// Each occurrence is weighted by the innermost recognized tag enclosing it;
/// text under `script` or `style` is not tokenized at all. When the same
/// token recurs in one document the weights sum downstream, so frequency and
/// importance both grow with repetition.
pub fn tokenize_html(html: &str) -> Vec<(String, u32)> {
    let dom = Html::parse_document(html);
    let mut out = Vec::new();
    for node in dom.tree.root().descendants() {
        let text = match node.value() {
            Node::Text(text) => &text.text,
            _ => continue,
        };
        let mut weight = DEFAULT_WEIGHT;
        let mut boosted = false;
        let mut hidden = false;
        for ancestor in node.ancestors() {
            if let Node::Element(element) = ancestor.value() {
                match element.name() {
                    "script" | "style" => {
                        hidden = true;
                        break;
                    }
                    name => {
                        if !boosted {
                            if let Some(w) = tag_weight(name) {
                                weight = w;
                                boosted = true;
                            }
                        }
                    }
                }
            }
        }
        if hidden {
            continue;
        }
        out.extend(scan(text, weight));
    }
    out
}
