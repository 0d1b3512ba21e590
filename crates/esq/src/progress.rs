//! 📊 progress.rs — "Are we there yet?" — every bulk ingest, every time, forever.
//!
//! One tick per completed batch, a docs/s rate, an elapsed clock. The CLI gets a
//! visible bar; library callers and tests get a hidden one that keeps count
//! in silence, like a good accountant.
//!
//! ⚠️ Watching this progress bar will not make it go faster. We've tried. Science says no.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// 🔢 Formats a number with commas for the 3 people in the audience who like readability.
/// "1000000 docs" → "1,000,000 docs" — you're welcome, eyes.
pub(crate) fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// ⏱️ Formats a Duration into MM:SS or HH:MM:SS.
/// If it shows HH:MM:SS, you should probably call your mom. It's been a while.
pub(crate) fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// 📊 Tracks how far a bulk ingest has gotten, one batch at a time.
pub struct BatchProgress {
    /// 🏷️ which index we're feeding, for the message line
    index_name: String,
    /// 📄 documents in batches that completed successfully
    docs_sent: u64,
    /// 📦 request body bytes shipped so far
    bytes_sent: u64,
    /// ✅ batches that made it. Counted here, the bar's position jumps to the end on finish
    batches_done: u64,
    progress_bar: ProgressBar,
    start_time: Instant,
}

impl std::fmt::Debug for BatchProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // -- 🎭 ProgressBar is a diva and doesn't derive Debug
        f.debug_struct("BatchProgress")
            .field("index_name", &self.index_name)
            .field("docs_sent", &self.docs_sent)
            .field("bytes_sent", &self.bytes_sent)
            .field("batches_done", &self.batches_done)
            .finish()
    }
}

impl BatchProgress {
    /// 🎨 A bar you can actually see. For humans at terminals.
    pub fn visible(index_name: impl Into<String>, total_batches: u64) -> Self {
        let progress_bar = ProgressBar::new(total_batches);
        // -- cyan because it's classy, blue because it's calm
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg}\n| [{bar:40.cyan/blue}] {pos}/{len} batches")
        {
            progress_bar.set_style(style.progress_chars("=>-"));
        }
        Self::with_bar(index_name.into(), progress_bar)
    }

    /// 🙈 Counts everything, draws nothing.
    pub fn hidden(index_name: impl Into<String>, total_batches: u64) -> Self {
        let progress_bar = ProgressBar::hidden();
        progress_bar.set_length(total_batches);
        Self::with_bar(index_name.into(), progress_bar)
    }

    fn with_bar(index_name: String, progress_bar: ProgressBar) -> Self {
        Self {
            index_name,
            docs_sent: 0,
            bytes_sent: 0,
            batches_done: 0,
            progress_bar,
            start_time: Instant::now(),
        }
    }

    /// 🔄 One more batch made it. Bump the counters, redraw the message.
    pub fn batch_completed(&mut self, docs: u64, bytes: u64) {
        self.docs_sent += docs;
        self.bytes_sent += bytes;
        self.batches_done += 1;
        self.progress_bar.inc(1);

        let elapsed = self.start_time.elapsed();
        let secs = elapsed.as_secs_f64();
        let docs_per_sec = if secs > 0.0 {
            (self.docs_sent as f64 / secs) as u64
        } else {
            0
        };
        self.progress_bar.set_message(format!(
            "index: {} | {} docs | {} docs/s | {} elapsed",
            self.index_name,
            format_number(self.docs_sent),
            format_number(docs_per_sec),
            format_duration(elapsed),
        ));
    }

    pub fn docs_sent(&self) -> u64 {
        self.docs_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn batches_done(&self) -> u64 {
        self.batches_done
    }

    /// ✅ Every batch went through. The bar fills up and stays up.
    pub fn finish(&self) {
        self.progress_bar.finish();
    }

    /// 💀 A batch broke the run. The bar stops where it is instead of pretending to be full.
    pub fn abandon(&self) {
        self.progress_bar.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_big_numbers_get_their_commas() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn the_one_where_time_is_a_flat_clock() {
        assert_eq!(format_duration(Duration::from_secs(65)), "01:05");
        assert_eq!(format_duration(Duration::from_secs(3725)), "01:02:05");
    }

    #[test]
    fn the_one_where_the_hidden_bar_still_counts() {
        let mut progress = BatchProgress::hidden("wiki", 3);
        progress.batch_completed(500, 40_000);
        progress.batch_completed(200, 16_000);
        progress.abandon();

        assert_eq!(progress.batches_done(), 2);
        assert_eq!(progress.docs_sent(), 700);
        assert_eq!(progress.bytes_sent(), 56_000);
    }

    #[test]
    fn the_one_where_a_finished_bar_does_not_inflate_the_count() {
        let mut progress = BatchProgress::hidden("wiki", 3);
        progress.batch_completed(500, 40_000);
        progress.finish();

        assert_eq!(progress.batches_done(), 1);
        assert_eq!(progress.docs_sent(), 500);
    }
}
