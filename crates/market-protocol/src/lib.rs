//! market-protocol
//!
//! Text-level encoding/decoding around the market core.
//!
//! - [`app_data`] : the data-source payload (`AppData`) and its decoder
//! - [`fallback`] : static dataset used when the data source fails
//! - [`csv_codec`]: headless line protocol (commands in, listing and
//!   notification lines out)

pub mod wire_types;
pub mod app_data;
pub mod fallback;
pub mod csv_codec;

pub use app_data::{
    ProtocolError,
    AppData,
    CropDetails,
    Seller,
    Specification,
    decode_app_data,
    strip_code_fence,
};
pub use fallback::fallback_app_data;
pub use csv_codec::{Command, format_listing_line, format_notification_line, parse_command_line};
