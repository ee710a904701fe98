//! Built-in splitter: greedy word wrap at a fixed column width
//!
//! Used when no browser-side text engine is supplied. It does not measure
//! glyphs. Source whitespace collapses the way rendered HTML collapses it,
//! `<br>` forces a break, and otherwise a line ends when the next word would
//! push it past `max_columns` characters. Inline markup is rebuilt inside each
//! line from shallow copies of the original elements, so `<em>` and links keep
//! their formatting while the reveal is mounted.

use super::{LineSplitter, Split, LINE_CLASS};
use crate::dom::{Dom, DomError};
use crate::error::RevealError;

pub const DEFAULT_MAX_COLUMNS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapSplitter {
    pub max_columns: usize,
}

impl Default for WrapSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COLUMNS)
    }
}

enum Token<W> {
    Word(W),
    Break,
}

/// Part of a word that sits under one chain of inline elements
#[derive(Debug, Clone)]
struct Fragment<N> {
    text: String,
    /// Elements between the target and the text node, outermost first
    path: Vec<N>,
}

type Word<N> = Vec<Fragment<N>>;

fn word_width<N>(word: &Word<N>) -> usize {
    word.iter().map(|f| f.text.chars().count()).sum()
}

impl WrapSplitter {
    pub fn new(max_columns: usize) -> Self {
        Self {
            max_columns: max_columns.max(1),
        }
    }

    /// Break plain `text` into line strings. All whitespace, newlines
    /// included, separates words and nothing else.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let tokens = text
            .split_ascii_whitespace()
            .map(|w| Token::Word(w.to_string()));
        self.fill(tokens, |w: &String| w.chars().count())
            .into_iter()
            .map(|words| words.join(" "))
            .collect()
    }

    fn fill<W>(
        &self,
        tokens: impl IntoIterator<Item = Token<W>>,
        width: impl Fn(&W) -> usize,
    ) -> Vec<Vec<W>> {
        let mut lines = Vec::new();
        let mut current = Vec::new();
        let mut used = 0;
        for token in tokens {
            match token {
                Token::Break => {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    used = 0;
                }
                Token::Word(word) => {
                    let w = width(&word);
                    if !current.is_empty() && used + 1 + w > self.max_columns {
                        lines.push(std::mem::take(&mut current));
                        used = 0;
                    }
                    if !current.is_empty() {
                        used += 1;
                    }
                    used += w;
                    current.push(word);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Walks a target's subtree and cuts its text into words
struct Words<N> {
    path: Vec<N>,
    word: Word<N>,
    tokens: Vec<Token<Word<N>>>,
}

impl<N: Clone + PartialEq> Words<N> {
    fn collect<D: Dom<Node = N>>(dom: &D, target: &N) -> Vec<Token<Word<N>>> {
        let mut words = Words {
            path: Vec::new(),
            word: Vec::new(),
            tokens: Vec::new(),
        };
        words.walk(dom, target);
        words.end_word();
        words.tokens
    }

    fn walk<D: Dom<Node = N>>(&mut self, dom: &D, node: &N) {
        for child in dom.child_nodes(node) {
            match dom.tag_name(&child).as_deref() {
                Some("br") => {
                    self.end_word();
                    self.tokens.push(Token::Break);
                }
                Some(_) => {
                    self.path.push(child.clone());
                    self.walk(dom, &child);
                    self.path.pop();
                }
                None => {
                    for c in dom.text_content(&child).chars() {
                        if c.is_ascii_whitespace() {
                            self.end_word();
                        } else {
                            self.push_char(c);
                        }
                    }
                }
            }
        }
    }

    fn push_char(&mut self, c: char) {
        if let Some(fragment) = self.word.last_mut().filter(|f| f.path == self.path) {
            fragment.text.push(c);
            return;
        }
        self.word.push(Fragment {
            text: c.to_string(),
            path: self.path.clone(),
        });
    }

    fn end_word(&mut self) {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word);
            self.tokens.push(Token::Word(word));
        }
    }
}

/// Drop open copies that are not ancestors of `path`
fn close_to<N: PartialEq>(open: &mut Vec<(N, N)>, path: &[N]) {
    let shared = open
        .iter()
        .zip(path)
        .take_while(|((original, _), p)| original == *p)
        .count();
    open.truncate(shared);
}

fn innermost<'a, N>(line: &'a N, open: &'a [(N, N)]) -> &'a N {
    open.last().map_or(line, |(_, copy)| copy)
}

fn append_text<D: Dom>(dom: &mut D, parent: &D::Node, text: &str) -> Result<(), DomError> {
    let node = dom.create_text(text)?;
    dom.append_child(parent, &node)
}

/// Detached `div.reveal-text-line` holding `words`
fn build_line<D: Dom>(dom: &mut D, words: &[Word<D::Node>]) -> Result<D::Node, DomError> {
    let line = dom.create_element("div")?;
    dom.add_class(&line, LINE_CLASS)?;

    // (original, copy) for each inline element open at the insertion point
    let mut open: Vec<(D::Node, D::Node)> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            if let Some(first) = word.first() {
                close_to(&mut open, &first.path);
            }
            let parent = innermost(&line, &open).clone();
            append_text(dom, &parent, " ")?;
        }
        for fragment in word {
            close_to(&mut open, &fragment.path);
            for original in &fragment.path[open.len()..] {
                let copy = dom.clone_shallow(original)?;
                dom.remove_attribute(&copy, "id")?;
                let parent = innermost(&line, &open).clone();
                dom.append_child(&parent, &copy)?;
                open.push((original.clone(), copy));
            }
            let parent = innermost(&line, &open).clone();
            append_text(dom, &parent, &fragment.text)?;
        }
    }
    Ok(line)
}

impl<D: Dom> LineSplitter<D> for WrapSplitter {
    /// Original child nodes of the target, detached while split
    type Handle = Vec<D::Node>;

    fn split(&mut self, dom: &mut D, target: &D::Node) -> Result<Split<D::Node, Self::Handle>, RevealError> {
        let words = Words::collect(&*dom, target);
        let laid_out = self.fill(words, |word: &Word<D::Node>| word_width(word));

        // Lines are built off-page so a failure leaves the target untouched
        let mut lines = Vec::with_capacity(laid_out.len());
        for words in &laid_out {
            lines.push(build_line(dom, words)?);
        }

        let originals = dom.child_nodes(target);
        for node in &originals {
            dom.remove_child(target, node)?;
        }
        for line in &lines {
            dom.append_child(target, line)?;
        }

        Ok(Split::new(target.clone(), lines, originals))
    }

    fn revert(&mut self, dom: &mut D, split: Split<D::Node, Self::Handle>) -> Result<(), RevealError> {
        for line in &split.lines {
            dom.detach(line)?;
        }
        for node in &split.handle {
            dom.append_child(&split.target, node)?;
        }
        Ok(())
    }
}
