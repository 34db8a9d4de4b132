use tether_serde::{BitReader, BitWriter};

use crate::{
    messages::{command_schema::CommandSignature, error::CommandError},
    world::component::field_value::FieldValue,
};

/// Default cap on encoded command arguments
pub const DEFAULT_MAX_COMMAND_BYTES: usize = 1024;

/// Encodes normalized arguments in parameter order
pub fn encode_args(
    signature: &CommandSignature,
    args: &[FieldValue],
    max_bytes: usize,
) -> Result<Vec<u8>, CommandError> {
    if args.len() != signature.params.len() {
        return Err(CommandError::ArgumentCount {
            command: signature.name.clone(),
            expected: signature.params.len(),
            actual: args.len(),
        });
    }

    let mut writer = BitWriter::new();
    for (index, (arg, param)) in args.iter().zip(signature.params.iter()).enumerate() {
        if arg.field_type() != param.field_type {
            return Err(CommandError::ArgumentType {
                command: signature.name.clone(),
                index,
                name: param.name.clone(),
                expected: param.field_type.name(),
                actual: arg.field_type().name(),
            });
        }
        arg.write(&mut writer);
    }

    let bytes = writer.byte_len();
    if bytes > max_bytes {
        return Err(CommandError::PayloadTooLarge {
            command: signature.name.clone(),
            bytes,
            limit: max_bytes,
        });
    }
    Ok(writer.to_bytes())
}

pub fn decode_args(
    signature: &CommandSignature,
    payload: &[u8],
) -> Result<Vec<FieldValue>, CommandError> {
    let mut reader = BitReader::new(payload);
    let mut args = Vec::with_capacity(signature.params.len());
    for param in &signature.params {
        let value = FieldValue::read(param.field_type, &mut reader).map_err(|err| {
            CommandError::Decode {
                command: signature.name.clone(),
                reason: format!("argument {}: {}", param.name, err),
            }
        })?;
        args.push(value);
    }
    Ok(args)
}
