// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration: plain-data options and the resolved configuration.
//!
//! [`TooltipOptions`] is a partial set of settings (every field optional).
//! Converting it into a [`TooltipConfig`] merges it over the defaults, which is
//! also what [`Tooltip::configure`](crate::Tooltip::configure) does: fields that
//! are not given fall back to their defaults, not to the previous configuration.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;
use core::time::Duration;

use kurbo::Vec2;

/// Default display delay in milliseconds.
pub const DEFAULT_DISPLAY_DELAY_MS: i64 = 500;
/// Default horizontal and vertical offset from the pointer.
pub const DEFAULT_OFFSET: f64 = 15.0;
/// Default polling interval in milliseconds.
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 250;
/// Default window after a mutation batch before re-probing.
pub const DEFAULT_COALESCE_DELAY_MS: u64 = 250;
/// Default batch size at which a mutation pass rescans the whole root instead.
pub const DEFAULT_RESCAN_THRESHOLD: usize = 10;
/// Default class given to the overlay element.
pub const DEFAULT_FRAME_CLASS: &str = "tooltip";

/// Converts a raw title into tooltip content. Receives the raw text and the node carrying it.
pub type TitleProcessor<N> = Rc<dyn Fn(&str, N) -> String>;

/// Partial configuration. Missing fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct TooltipOptions {
    /// Delay before showing, in milliseconds. Non-positive shows immediately.
    pub display_delay_ms: Option<i64>,
    /// Horizontal offset from the pointer.
    pub offset_x: Option<f64>,
    /// Vertical offset from the pointer.
    pub offset_y: Option<f64>,
    /// Polling interval in milliseconds; `0` disables polling.
    pub polling_interval_ms: Option<u64>,
    /// Coalescing window after a mutation batch, in milliseconds.
    pub coalesce_delay_ms: Option<u64>,
    /// Batch size at which a mutation pass rescans the whole root.
    pub rescan_threshold: Option<usize>,
    /// Class given to the overlay element.
    pub frame_class: Option<String>,
}

/// Resolved configuration.
pub struct TooltipConfig<N> {
    /// Delay before showing, in milliseconds. Non-positive shows immediately.
    pub display_delay_ms: i64,
    /// Horizontal offset from the pointer.
    pub offset_x: f64,
    /// Vertical offset from the pointer.
    pub offset_y: f64,
    /// Polling interval in milliseconds; `0` disables polling.
    pub polling_interval_ms: u64,
    /// Coalescing window after a mutation batch, in milliseconds.
    pub coalesce_delay_ms: u64,
    /// Batch size at which a mutation pass rescans the whole root.
    pub rescan_threshold: usize,
    /// Class given to the overlay element.
    pub frame_class: String,
    /// Raw title → plain text.
    pub title_processor: Option<TitleProcessor<N>>,
    /// Raw title → HTML. Wins over [`TooltipConfig::title_processor`].
    pub title_to_html_processor: Option<TitleProcessor<N>>,
}

impl<N> Default for TooltipConfig<N> {
    fn default() -> Self {
        Self {
            display_delay_ms: DEFAULT_DISPLAY_DELAY_MS,
            offset_x: DEFAULT_OFFSET,
            offset_y: DEFAULT_OFFSET,
            polling_interval_ms: DEFAULT_POLLING_INTERVAL_MS,
            coalesce_delay_ms: DEFAULT_COALESCE_DELAY_MS,
            rescan_threshold: DEFAULT_RESCAN_THRESHOLD,
            frame_class: String::from(DEFAULT_FRAME_CLASS),
            title_processor: None,
            title_to_html_processor: None,
        }
    }
}

impl<N> Clone for TooltipConfig<N> {
    fn clone(&self) -> Self {
        Self {
            display_delay_ms: self.display_delay_ms,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            polling_interval_ms: self.polling_interval_ms,
            coalesce_delay_ms: self.coalesce_delay_ms,
            rescan_threshold: self.rescan_threshold,
            frame_class: self.frame_class.clone(),
            title_processor: self.title_processor.clone(),
            title_to_html_processor: self.title_to_html_processor.clone(),
        }
    }
}

impl<N> fmt::Debug for TooltipConfig<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipConfig")
            .field("display_delay_ms", &self.display_delay_ms)
            .field("offset_x", &self.offset_x)
            .field("offset_y", &self.offset_y)
            .field("polling_interval_ms", &self.polling_interval_ms)
            .field("coalesce_delay_ms", &self.coalesce_delay_ms)
            .field("rescan_threshold", &self.rescan_threshold)
            .field("frame_class", &self.frame_class)
            .field("title_processor", &self.title_processor.is_some())
            .field(
                "title_to_html_processor",
                &self.title_to_html_processor.is_some(),
            )
            .finish()
    }
}

impl<N> From<TooltipOptions> for TooltipConfig<N> {
    fn from(options: TooltipOptions) -> Self {
        Self::default().with_options(options)
    }
}

impl<N> TooltipConfig<N> {
    /// Override fields present in `options`.
    #[must_use]
    pub fn with_options(mut self, options: TooltipOptions) -> Self {
        let TooltipOptions {
            display_delay_ms,
            offset_x,
            offset_y,
            polling_interval_ms,
            coalesce_delay_ms,
            rescan_threshold,
            frame_class,
        } = options;
        if let Some(v) = display_delay_ms {
            self.display_delay_ms = v;
        }
        if let Some(v) = offset_x {
            self.offset_x = v;
        }
        if let Some(v) = offset_y {
            self.offset_y = v;
        }
        if let Some(v) = polling_interval_ms {
            self.polling_interval_ms = v;
        }
        if let Some(v) = coalesce_delay_ms {
            self.coalesce_delay_ms = v;
        }
        if let Some(v) = rescan_threshold {
            self.rescan_threshold = v;
        }
        if let Some(v) = frame_class {
            self.frame_class = v;
        }
        self
    }

    /// Set the raw title → text processor.
    #[must_use]
    pub fn with_title_processor(mut self, f: impl Fn(&str, N) -> String + 'static) -> Self {
        self.title_processor = Some(Rc::new(f));
        self
    }

    /// Set the raw title → HTML processor.
    #[must_use]
    pub fn with_title_to_html_processor(
        mut self,
        f: impl Fn(&str, N) -> String + 'static,
    ) -> Self {
        self.title_to_html_processor = Some(Rc::new(f));
        self
    }

    /// Pointer offset as a vector.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    /// Polling interval, `None` when polling is disabled.
    pub fn polling_interval(&self) -> Option<Duration> {
        (self.polling_interval_ms > 0).then(|| Duration::from_millis(self.polling_interval_ms))
    }

    /// Coalescing window after a mutation batch.
    pub fn coalesce_delay(&self) -> Duration {
        Duration::from_millis(self.coalesce_delay_ms)
    }
}
