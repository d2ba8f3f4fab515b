//! Hex digests and base64/base16 text encodings.

use md5::Md5;
use rad_diagnostic::ErrorCode;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use super::{bool_arg, some, str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::{other, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) const ENTRIES: &[Entry] = &[
    (
        r#"hash(_val: str, algo: ["sha1", "sha256", "sha512", "md5"] = "sha1") -> str"#,
        hash,
    ),
    (
        r"encode_base64(_content: str, *, url_safe: bool = false, padding: bool = true) -> str",
        encode_base64,
    ),
    (
        r"decode_base64(_content: str, *, url_safe: bool = false, padding: bool = true) -> str",
        decode_base64,
    ),
    (r"encode_base16(_content: str) -> str", encode_base16),
    (r"decode_base16(_content: str) -> str", decode_base16),
];

fn hash(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let content = str_arg(args, "_val")?.plain().into_owned();
    let bytes = content.as_bytes();
    let digest = match str_arg(args, "algo")?.plain().as_ref() {
        "sha1" => hex::encode(Sha1::digest(bytes)),
        "sha256" => hex::encode(Sha256::digest(bytes)),
        "sha512" => hex::encode(Sha512::digest(bytes)),
        "md5" => hex::encode(Md5::digest(bytes)),
        algo => {
            return Err(other(
                ErrorCode::GenericRuntime,
                format!("Unsupported hash algorithm \"{algo}\"; supported: sha1, sha256, sha512, md5"),
            ))
        }
    };
    some(digest)
}

fn base64_engine(args: &BoundArgs) -> EvalResult<&'static base64_simd::Base64> {
    let url_safe = bool_arg(args, "url_safe")?;
    let padding = bool_arg(args, "padding")?;
    Ok(match (url_safe, padding) {
        (false, true) => &base64_simd::STANDARD,
        (false, false) => &base64_simd::STANDARD_NO_PAD,
        (true, true) => &base64_simd::URL_SAFE,
        (true, false) => &base64_simd::URL_SAFE_NO_PAD,
    })
}

fn encode_base64(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let content = str_arg(args, "_content")?;
    some(base64_engine(args)?.encode_to_string(content.plain().as_bytes()))
}

fn decode_base64(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let content = str_arg(args, "_content")?;
    let bytes = base64_engine(args)?
        .decode_to_vec(content.plain().as_bytes())
        .map_err(|e| other(ErrorCode::Decode, format!("Error decoding base64: {e}")))?;
    some(String::from_utf8_lossy(&bytes).into_owned())
}

fn encode_base16(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    some(hex::encode(str_arg(args, "_content")?.plain().as_bytes()))
}

fn decode_base16(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let content = str_arg(args, "_content")?;
    let bytes = hex::decode(content.plain().as_bytes())
        .map_err(|e| other(ErrorCode::Decode, format!("Error decoding base16: {e}")))?;
    some(String::from_utf8_lossy(&bytes).into_owned())
}
