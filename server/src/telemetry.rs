//! Structured logging setup.
//!
//! # Design
//! The global filter sits behind a `reload` layer so channel levels can
//! change while the server runs. `FilterSink` is the `LevelSink` handed to
//! the service: each level change rebuilds the `EnvFilter` from the base
//! directive plus one directive per channel target and swaps it in.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use todo_core::{Channel, ChannelLevels, LevelSink};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

use crate::config::Config;

type Base = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type ChannelLayer = Box<dyn Layer<Base> + Send + Sync>;

/// Builds the filter for the given channel levels on top of `base`.
pub fn channel_filter(base: &str, levels: ChannelLevels) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    let mut directives = base.to_string();
    for channel in Channel::ALL {
        directives.push_str(&format!(",{}={}", channel.target(), levels.get(channel).directive()));
    }
    EnvFilter::try_new(directives)
}

/// Pushes channel level changes into the live subscriber.
pub struct FilterSink {
    base: String,
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LevelSink for FilterSink {
    fn apply(&self, levels: ChannelLevels) {
        let filter = match channel_filter(&self.base, levels) {
            Ok(filter) => filter,
            Err(err) => {
                tracing::warn!("invalid log filter, keeping the current one: {err}");
                return;
            }
        };
        if let Err(err) = self.handle.reload(filter) {
            tracing::warn!("failed to reload log filter: {err}");
        }
    }
}

/// Installs the global subscriber and returns the sink that controls it.
pub fn init(config: &Config) -> anyhow::Result<FilterSink> {
    let filter = channel_filter(&config.log_filter, ChannelLevels::default())?;
    let (filter, handle) = reload::Layer::new(filter);

    let files = match config.log_dir.as_deref() {
        Some(dir) => channel_files(Path::new(dir))?,
        None => Vec::new(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(files)
        .with(fmt::layer().with_timer(timestamp()))
        .try_init()?;

    Ok(FilterSink {
        base: config.log_filter.clone(),
        handle,
    })
}

/// One append-only file per channel, each receiving only its own target.
fn channel_files(dir: &Path) -> std::io::Result<Vec<ChannelLayer>> {
    std::fs::create_dir_all(dir)?;
    Channel::ALL
        .into_iter()
        .map(|channel| {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(file_name(channel)))?;
            let targets = Targets::new().with_target(channel.target(), LevelFilter::TRACE);
            Ok(fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_timer(timestamp())
                .with_filter(targets)
                .boxed())
        })
        .collect()
}

fn file_name(channel: Channel) -> &'static str {
    match channel {
        Channel::Request => "requests.log",
        Channel::Todo => "todos.log",
    }
}

fn timestamp() -> ChronoLocal {
    ChronoLocal::new("%d-%m-%Y %H:%M:%S%.3f".to_string())
}

#[cfg(test)]
mod tests {
    use todo_core::LogLevel;

    use super::*;

    #[test]
    fn filter_lists_every_channel_after_base() {
        let levels = ChannelLevels {
            request: LogLevel::Error,
            todo: LogLevel::Info,
        };
        let filter = channel_filter("warn", levels).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("request=error"), "{rendered}");
        assert!(rendered.contains("todo=info"), "{rendered}");
        assert!(rendered.contains("warn"), "{rendered}");
    }

    #[test]
    fn sink_survives_a_dropped_subscriber() {
        let (layer, handle) = reload::Layer::<_, Registry>::new(EnvFilter::new("info"));
        drop(layer);
        let sink = FilterSink {
            base: "info".to_string(),
            handle,
        };
        sink.apply(ChannelLevels::default());
        assert!(sink.handle.reload(EnvFilter::new("info")).is_err());
    }

    #[test]
    fn channel_files_are_named_after_channels() {
        assert_eq!(file_name(Channel::Request), "requests.log");
        assert_eq!(file_name(Channel::Todo), "todos.log");
    }
}
