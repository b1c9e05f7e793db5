//! Track resolvers backed by external tools

mod ytdlp;

pub use ytdlp::{parse_search_output, parse_stream_output, YtDlpResolver};
