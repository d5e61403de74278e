//! TUI widget rendering: editor, result panels, word-cloud preview, notices.

use std::time::Duration;

use image::RgbImage;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::animation::{Animation, AnimationSet};
use crate::document::TextStats;
use crate::message::Notice;
use crate::pipeline::{Analysis, RunOutcome, SessionState};
use crate::summarize::SummaryLengthProfile;

/// Everything one frame needs.
pub struct View<'a> {
    pub profile: SummaryLengthProfile,
    pub editor_title: &'a str,
    pub editor: &'a str,
    pub stats: Option<TextStats>,
    pub state: &'a SessionState,
    pub notices: &'a [Notice],
    pub show_summary: bool,
    pub show_keywords: bool,
    /// Path being typed after Ctrl-O.
    pub prompt: Option<&'a str>,
    pub animations: &'a AnimationSet,
    pub elapsed: Duration,
}

/// Render a notice as a styled line.
pub fn notice_to_line(notice: &Notice) -> Line<'static> {
    match notice {
        Notice::Success { text } => Line::from(vec![
            Span::styled("✔ ", Style::default().fg(Color::Green)),
            Span::raw(text.clone()),
        ]),
        Notice::Warning { text } => Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(Color::Yellow)),
            Span::styled(text.clone(), Style::default().fg(Color::Yellow)),
        ]),
        Notice::Info { text } => Line::from(vec![
            Span::styled("ℹ ", Style::default().fg(Color::Blue)),
            Span::raw(text.clone()),
        ]),
        Notice::Progress { text } => Line::from(vec![Span::styled(
            text.clone(),
            Style::default().fg(Color::DarkGray),
        )]),
        Notice::Toast { text } => Line::from(vec![Span::styled(
            text.clone(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )]),
        Notice::Error {
            code,
            message,
            help,
        } => {
            let mut spans = vec![
                Span::styled(
                    format!("[error:{code}] "),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.clone()),
            ];
            if let Some(h) = help {
                spans.push(Span::styled(
                    format!(" (help: {h})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
    }
}

fn spinner(animation: Option<&Animation>, elapsed: Duration) -> String {
    animation
        .map(|a| format!("{} ", a.spinner(elapsed)))
        .unwrap_or_default()
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Main TUI layout rendering.
pub fn render(frame: &mut Frame, view: &View<'_>) {
    let [header_area, editor_area, stats_area, results_area, notices_area, status_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Percentage(30),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    // Header.
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " pagebrief ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " {}AI text summarizer :: length: {} ",
            spinner(view.animations.summary.as_ref(), view.elapsed),
            view.profile.label()
        )),
    ]));
    frame.render_widget(header, header_area);

    // Editor.
    let editor = Paragraph::new(view.editor)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.editor_title)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(editor, editor_area);

    if let Some(stats) = view.stats {
        frame.render_widget(Paragraph::new(format!(" Input {stats}")).style(dim()), stats_area);
    }

    render_results(frame, results_area, view);

    // Notices, newest last.
    let shown = view.notices.len().saturating_sub(notices_area.height as usize);
    let lines: Vec<Line> = view.notices[shown..].iter().map(notice_to_line).collect();
    frame.render_widget(Paragraph::new(lines), notices_area);

    // Status / prompt line.
    let status = match view.prompt {
        Some(path) => Line::from(vec![
            Span::styled(" Upload PDF: ", Style::default().fg(Color::Cyan)),
            Span::raw(path.to_string()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]),
        None => Line::from(vec![Span::styled(
            " Ctrl-S summarize | Ctrl-O upload | Ctrl-X clear | F2 length | F3 summary | \
             F4 keywords | Ctrl-D download | Ctrl-W save cloud | Esc quit ",
            dim(),
        )]),
    };
    frame.render_widget(Paragraph::new(status), status_area);
}

fn render_results(frame: &mut Frame, area: Rect, view: &View<'_>) {
    match view.state {
        SessionState::Idle => {}
        SessionState::Processing => {
            let busy = Paragraph::new(format!(
                "{}Generating summary...",
                spinner(view.animations.summary.as_ref(), view.elapsed)
            ))
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(busy, area);
        }
        SessionState::Resulted(RunOutcome::Failed(err)) => {
            let notice = Notice::from_diagnostic(err);
            let failed = Paragraph::new(notice_to_line(&notice))
                .block(Block::default().borders(Borders::ALL).title(" Failed "))
                .wrap(Wrap { trim: false });
            frame.render_widget(failed, area);
        }
        SessionState::Resulted(RunOutcome::Completed(analysis)) => {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .areas(area);
            render_text_panels(frame, left, analysis, view);

            let title = format!(
                " {}Keyword Word Cloud ",
                spinner(view.animations.wordcloud.as_ref(), view.elapsed)
            );
            let block = Block::default().borders(Borders::ALL).title(title);
            let inner = block.inner(right);
            frame.render_widget(block, right);
            if let Some(cloud) = &analysis.cloud {
                frame.render_widget(CloudPreview::new(cloud.image()), inner);
            }
        }
    }
}

fn render_text_panels(frame: &mut Frame, area: Rect, analysis: &Analysis, view: &View<'_>) {
    let mut lines = Vec::new();

    let marker = |open: bool| if open { "▾" } else { "▸" };
    lines.push(Line::from(Span::styled(
        format!("{} View Summary (F3)", marker(view.show_summary)),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if view.show_summary {
        lines.push(Line::from(Span::styled(
            analysis.summary.text().to_string(),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            format!("Summary {}", analysis.summary.stats()),
            dim(),
        )));
        lines.push(Line::from(Span::styled(
            "Ctrl-D: download summary.txt",
            dim(),
        )));
    }
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        format!(
            "{}Top Keywords from the Text",
            spinner(view.animations.keywords.as_ref(), view.elapsed)
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if !analysis.keywords.is_empty() {
        lines.push(Line::from(format!(
            "{} View Keywords (F4)",
            marker(view.show_keywords)
        )));
        if view.show_keywords {
            for (i, phrase) in analysis.keywords.phrases().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}. ", i + 1),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(phrase.to_string()),
                ]));
            }
        }
    }

    let panels = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(panels, area);
}

/// Box-filter `image` down to `cols × rows` pixels.
pub fn downsample(image: &RgbImage, cols: u32, rows: u32) -> Vec<[u8; 3]> {
    let (w, h) = image.dimensions();
    if cols == 0 || rows == 0 || w == 0 || h == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity((cols * rows) as usize);
    for r in 0..rows {
        let y0 = r * h / rows;
        let y1 = ((r + 1) * h / rows).max(y0 + 1).min(h);
        for c in 0..cols {
            let x0 = c * w / cols;
            let x1 = ((c + 1) * w / cols).max(x0 + 1).min(w);
            let mut sum = [0u64; 3];
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = image.get_pixel(x, y).0;
                    for i in 0..3 {
                        sum[i] += u64::from(p[i]);
                    }
                }
            }
            let n = u64::from((x1 - x0) * (y1 - y0));
            out.push([
                (sum[0] / n) as u8,
                (sum[1] / n) as u8,
                (sum[2] / n) as u8,
            ]);
        }
    }
    out
}

/// Half-block preview of a raster: each cell shows two stacked pixels.
pub struct CloudPreview<'a> {
    image: &'a RgbImage,
}

impl<'a> CloudPreview<'a> {
    pub fn new(image: &'a RgbImage) -> Self {
        Self { image }
    }

    /// Largest preview (cells) that fits `area` at the image's aspect ratio.
    pub fn fit(&self, area: Rect) -> (u16, u16) {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return (0, 0);
        }
        let max_cols = u32::from(area.width);
        let max_px_rows = u32::from(area.height) * 2;
        let cols = max_cols.min(max_px_rows * w / h);
        let rows = (cols * h / w).div_ceil(2);
        (cols as u16, rows.min(u32::from(area.height)) as u16)
    }
}

impl Widget for CloudPreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (cols, rows) = self.fit(area);
        let pixels = downsample(self.image, u32::from(cols), u32::from(rows) * 2);
        if pixels.is_empty() {
            return;
        }
        let x_off = area.x + (area.width - cols) / 2;
        let y_off = area.y + (area.height - rows) / 2;
        for r in 0..rows {
            for c in 0..cols {
                let top = pixels[(2 * r as usize) * cols as usize + c as usize];
                let bottom = pixels[(2 * r as usize + 1) * cols as usize + c as usize];
                if let Some(cell) = buf.cell_mut((x_off + c, y_off + r)) {
                    cell.set_char('▀')
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn downsample_averages_blocks() {
        let mut img = RgbImage::from_pixel(4, 2, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 0]));
        let px = downsample(&img, 2, 1);
        assert_eq!(px.len(), 2);
        assert_eq!(px[0], [127, 127, 127]);
        assert_eq!(px[1], [255, 255, 255]);
    }

    #[test]
    fn preview_keeps_aspect_ratio() {
        let img = RgbImage::new(800, 400);
        let preview = CloudPreview::new(&img);
        assert_eq!(preview.fit(Rect::new(0, 0, 80, 40)), (80, 20));
        assert_eq!(preview.fit(Rect::new(0, 0, 80, 10)), (40, 10));
    }

    #[test]
    fn preview_draws_half_blocks() {
        let img = RgbImage::from_pixel(8, 4, Rgb([10, 20, 30]));
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);
        CloudPreview::new(&img).render(area, &mut buf);
        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn error_notice_shows_code() {
        let line = notice_to_line(&Notice::Error {
            code: "pagebrief::x".into(),
            message: "boom".into(),
            help: None,
        });
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("[error:pagebrief::x] boom"));
    }
}
