use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};

/// Dense document identifier, assigned in corpus-traversal order.
/// Line `k` (1-indexed) of `urls.txt` holds the URL of doc `k - 1`.
pub type DocId = u32;

/// Posting carried through index construction, before scores exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPosting {
    #[serde(rename = "docID")]
    pub doc_id: DocId,
    pub tf: u32,
    pub importance: u32,
}

/// Posting in the final index: construction stats collapsed to one score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalPosting {
    #[serde(rename = "docID")]
    pub doc_id: DocId,
    pub tf_idf: f64,
}

/// One line of a line-delimited index file: a token and its posting list,
/// sorted ascending by doc id with each doc id appearing at most once.
///
/// The construction and final phases share this shape and differ only in
/// the posting payload.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord<P> {
    pub token: String,
    pub postings: Vec<P>,
}

impl<P: Serialize> IndexRecord<P> {
    /// Serialize as the single-key JSON object `{"<token>": [postings]}`.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        let mut map = serde_json::Map::with_capacity(1);
        map.insert(self.token.clone(), serde_json::to_value(&self.postings)?);
        serde_json::to_string(&serde_json::Value::Object(map))
    }
}

impl<P: DeserializeOwned> IndexRecord<P> {
    /// Parse one line. Exactly one token per record; anything else is a
    /// malformed index file.
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line)?;
        if map.len() != 1 {
            return Err(serde_json::Error::custom("expected exactly one token per record"));
        }
        let (token, value) = map.into_iter().next().expect("length checked above");
        let postings = serde_json::from_value(value)?;
        Ok(IndexRecord { token, postings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_record_round_trips() {
        let record = IndexRecord {
            token: "cat".to_string(),
            postings: vec![
                BuildPosting { doc_id: 0, tf: 3, importance: 12 },
                BuildPosting { doc_id: 7, tf: 1, importance: 1 },
            ],
        };
        let line = record.to_json_line().unwrap();
        assert!(line.starts_with(r#"{"cat":[{"docID":0,"#));
        let parsed = IndexRecord::<BuildPosting>::from_json_line(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn final_record_keeps_float_payload() {
        let record = IndexRecord {
            token: "dog".to_string(),
            postings: vec![FinalPosting { doc_id: 1, tf_idf: 0.30103 }],
        };
        let parsed =
            IndexRecord::<FinalPosting>::from_json_line(&record.to_json_line().unwrap()).unwrap();
        assert_eq!(parsed.postings[0].doc_id, 1);
        assert!((parsed.postings[0].tf_idf - 0.30103).abs() < 1e-12);
    }

    #[test]
    fn rejects_multi_token_lines() {
        let line = r#"{"cat": [], "dog": []}"#;
        assert!(IndexRecord::<BuildPosting>::from_json_line(line).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(IndexRecord::<BuildPosting>::from_json_line("not json").is_err());
    }
}
