use crate::args::{CodecArgs, FieldKind};
use crate::codec::{decode_text, encode_text};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::{anyhow, Context};

/// Decodes an obfuscated number or name with the configured codec.
pub fn decode(config: &Config, args: &CodecArgs) -> Result<Out<String>> {
    let decoded = match args.kind() {
        FieldKind::Number => config
            .codec()
            .decode_number(args.value())
            .ok_or_else(|| anyhow!("'{}' is not an encoded number", args.value()))
            .pub_result(ErrorType::Decode)?
            .to_string(),
        FieldKind::Text => decode_text(args.value()),
    };
    Ok(Out::new(format!("Decoded {}", args.kind()), decoded))
}

/// Encodes a plain number or name with the configured codec.
pub fn encode(config: &Config, args: &CodecArgs) -> Result<Out<String>> {
    let encoded = match args.kind() {
        FieldKind::Number => {
            let n: i64 = args
                .value()
                .trim()
                .parse()
                .with_context(|| format!("'{}' is not an integer", args.value()))
                .pub_result(ErrorType::Decode)?;
            config.codec().encode_number(n)
        }
        FieldKind::Text => encode_text(args.value()),
    };
    Ok(Out::new(format!("Encoded {}", args.kind()), encoded))
}
