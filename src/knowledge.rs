//! Sales coaching knowledge base: `.txt` documents chunked and ranked by
//! query-term overlap. Retrieved snippets feed the objection pass's prompt.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

/// One ranked retrieval result.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub content: String,
    pub category: String,
    pub score: f64,
}

#[derive(Debug)]
struct Chunk {
    content: String,
    category: String,
    terms: HashSet<String>,
}

/// Knowledge-retrieval collaborator: given a query, return ranked snippets.
pub struct KnowledgeBase {
    chunks: Vec<Chunk>,
}

impl KnowledgeBase {
    /// Load every `.txt` file under `dir`, chunking by character count with
    /// overlap. A missing directory yields an empty base, not an error.
    pub fn load(dir: &Path, chunk_size: usize, chunk_overlap: usize) -> Self {
        let mut chunks = Vec::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => {
                warn!("Knowledge base path not found: {}", dir.display());
                return Self { chunks };
            }
        };

        let mut documents = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable document {}: {}", path.display(), e);
                    continue;
                }
            };

            let category = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("general")
                .to_string();

            for piece in chunk_text(&content, chunk_size, chunk_overlap) {
                chunks.push(Chunk {
                    terms: tokenize(&piece),
                    content: piece,
                    category: category.clone(),
                });
            }

            documents += 1;
            info!("Loaded document: {}", path.display());
        }

        info!("Created {} chunks from {} documents", chunks.len(), documents);
        Self { chunks }
    }

    pub fn empty() -> Self {
        Self { chunks: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Rank chunks by the fraction of query terms they contain.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<Snippet> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<Snippet> = self
            .chunks
            .iter()
            .filter_map(|chunk| {
                let overlap = query_terms.intersection(&chunk.terms).count();
                if overlap == 0 {
                    return None;
                }
                Some(Snippet {
                    content: chunk.content.clone(),
                    category: chunk.category.clone(),
                    score: overlap as f64 / query_terms.len() as f64,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        info!("Retrieved {} context snippets for query", scored.len());
        scored
    }

    /// Render snippets as the prompt context block. Empty input renders empty.
    pub fn format_for_prompt(snippets: &[Snippet]) -> String {
        if snippets.is_empty() {
            return String::new();
        }

        let mut formatted = String::from("# SALES COACHING KNOWLEDGE BASE\n\n");
        for (i, snippet) in snippets.iter().enumerate() {
            formatted.push_str(&format!("## Context {} ({})\n", i + 1, snippet.category));
            formatted.push_str(&snippet.content);
            formatted.push_str("\n\n");
        }

        formatted
    }
}

/// Character-windowed chunking with overlap between consecutive chunks.
fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(|t| t.to_lowercase())
        .collect()
}
