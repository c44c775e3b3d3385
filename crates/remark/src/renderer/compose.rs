//! Merging token runs with annotation boundaries, one line at a time.
//!
//! Ranged annotations wrap whole token spans: a run that an annotation
//! boundary falls inside is split into sub-spans sharing its style. Point
//! annotations never split a run; their marker goes at the first run boundary
//! at or after their column.

use super::lines::{Line, LineIndex, char_slice};
use super::markup;
use twomark_core::{Annotation, RenderError, Token};

#[derive(Debug, Clone, Copy)]
struct Ranged<'a> {
    start: usize,
    end: usize,
    annotation: &'a Annotation,
}

#[derive(Debug, Clone, Copy)]
struct Point<'a> {
    offset: usize,
    annotation: &'a Annotation,
}

/// Validated annotations, ordered for emission.
#[derive(Debug)]
pub(super) struct AnnotationPlan<'a> {
    ranged: Vec<Ranged<'a>>,
    points: Vec<Point<'a>>,
}

impl<'a> AnnotationPlan<'a> {
    /// Checks offsets against the source length and rejects partial overlaps.
    ///
    /// A ranged annotation covering only line terminators has no text to wrap;
    /// it is kept as a marker at the end of the line it starts on.
    pub(super) fn new(annotations: &'a [Annotation], index: &LineIndex<'_>) -> Result<Self, RenderError> {
        let source_len = index.len();
        let mut ranged = Vec::new();
        let mut points = Vec::new();
        for annotation in annotations {
            if annotation.start > annotation.end || annotation.end > source_len {
                return Err(RenderError::AnnotationOutOfRange {
                    kind: annotation.kind(),
                    start: annotation.start,
                    end: annotation.end,
                    source_len,
                });
            }
            if annotation.is_point() || !covers_text(index, annotation.start, annotation.end) {
                points.push(Point {
                    offset: annotation.start,
                    annotation,
                });
            } else {
                ranged.push(Ranged {
                    start: annotation.start,
                    end: annotation.end,
                    annotation,
                });
            }
        }

        // Outer ranges first; stable sorts keep input order for identical ranges.
        ranged.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        points.sort_by_key(|p| p.offset);

        let mut enclosing: Vec<&Ranged<'_>> = Vec::new();
        for range in &ranged {
            while enclosing.last().is_some_and(|top| top.end <= range.start) {
                enclosing.pop();
            }
            if let Some(top) = enclosing.last()
                && range.end > top.end
            {
                return Err(RenderError::PartialOverlap {
                    first: (top.start, top.end),
                    second: (range.start, range.end),
                });
            }
            enclosing.push(range);
        }

        Ok(Self { ranged, points })
    }
}

/// Whether `[start, end)` holds at least one char of line text.
fn covers_text(index: &LineIndex<'_>, start: usize, end: usize) -> bool {
    index.lines().iter().any(|line| {
        start.max(line.start) < end.min(line.start + line.len)
    })
}

/// Fails unless the runs reproduce `expected` exactly.
pub(super) fn check_tokens(line: usize, expected: &str, tokens: &[Token]) -> Result<(), RenderError> {
    let found: String = tokens.iter().map(|t| t.content.as_str()).collect();
    if found != expected {
        return Err(RenderError::TokenMismatch {
            line,
            expected: expected.to_string(),
            found,
        });
    }
    Ok(())
}

/// Line-local view of the plan, in columns.
struct LineComposer<'a> {
    clips: Vec<Ranged<'a>>,
    points: Vec<Point<'a>>,
    next_clip: usize,
    next_point: usize,
    open: Vec<usize>,
}

impl<'a> LineComposer<'a> {
    fn new(plan: &AnnotationPlan<'a>, index: &LineIndex<'_>, number: usize, line: &Line<'_>) -> Self {
        let line_end = line.start + line.len;
        let mut clips: Vec<Ranged<'a>> = plan
            .ranged
            .iter()
            .filter_map(|r| {
                let start = r.start.max(line.start);
                let end = r.end.min(line_end);
                (start < end).then(|| Ranged {
                    start: start - line.start,
                    end: end - line.start,
                    annotation: r.annotation,
                })
            })
            .collect();
        clips.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let points = plan
            .points
            .iter()
            .filter(|p| index.line_of(p.offset) == Some(number))
            .map(|p| Point {
                offset: (p.offset - line.start).min(line.len),
                annotation: p.annotation,
            })
            .collect();

        Self {
            clips,
            points,
            next_clip: 0,
            next_point: 0,
            open: Vec::new(),
        }
    }

    /// Columns strictly inside `(start, end)` where a wrapper opens or closes.
    fn cuts(&self, start: usize, end: usize) -> Vec<usize> {
        let mut cuts: Vec<usize> = self
            .clips
            .iter()
            .flat_map(|c| [c.start, c.end])
            .filter(|&col| col > start && col < end)
            .collect();
        cuts.sort_unstable();
        cuts.dedup();
        cuts
    }

    /// Closes wrappers ending at `col`, emits due markers, then opens wrappers starting at `col`.
    fn boundary(&mut self, out: &mut String, col: usize) {
        while let Some(&top) = self.open.last() {
            if self.clips[top].end > col {
                break;
            }
            markup::close_annotation(out, self.clips[top].annotation);
            self.open.pop();
        }
        while let Some(point) = self.points.get(self.next_point) {
            if point.offset > col {
                break;
            }
            markup::marker(out, point.annotation);
            self.next_point += 1;
        }
        while let Some(clip) = self.clips.get(self.next_clip) {
            if clip.start > col {
                break;
            }
            markup::open_annotation(out, clip.annotation);
            self.open.push(self.next_clip);
            self.next_clip += 1;
        }
    }
}

/// Writes one `<div class="line">` for `line`.
pub(super) fn compose_line(
    out: &mut String,
    plan: &AnnotationPlan<'_>,
    index: &LineIndex<'_>,
    number: usize,
    line: &Line<'_>,
    tokens: &[Token],
) {
    let mut composer = LineComposer::new(plan, index, number, line);
    markup::open_line(out);

    let mut col = 0;
    for token in tokens.iter().filter(|t| !t.content.is_empty()) {
        let token_len = token.content.chars().count();
        let token_end = col + token_len;
        let mut segment_start = col;
        for segment_end in composer
            .cuts(col, token_end)
            .into_iter()
            .chain(std::iter::once(token_end))
        {
            composer.boundary(out, segment_start);
            let text = char_slice(&token.content, segment_start - col, segment_end - col);
            markup::token_span(out, token, text);
            segment_start = segment_end;
        }
        col = token_end;
    }
    composer.boundary(out, line.len);

    markup::close_line(out);
    log::trace!(
        "Composed line {} with {} wrappers and {} markers",
        number,
        composer.clips.len(),
        composer.points.len()
    );
}
