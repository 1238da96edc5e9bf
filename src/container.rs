/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The outer container format (§6): magic bytes, a Brotli-compressed
//! string-table section, and a length-prefixed graph bitstream
//! section. This module owns only the byte-layout logic — it treats
//! the graph bitstream as an opaque blob and defers its internal
//! structure to [`crate::graph`].

use std::io::Cursor;

use brotli::enc::BrotliEncoderParams;

use crate::error::{Error, Result};
use crate::graph;
use crate::schema::Schema;
use crate::value::Value;

/// "盆栽" ("bonsai"), encoded as UTF-16BE: the container's magic prefix.
const MAGIC: [u8; 4] = [0x76, 0xc6, 0x68, 0x3d];

/// Encodes `tree` against `schema` into the full container byte
/// layout.
pub fn encode(schema: &Schema, tree: &Value) -> Result<Vec<u8>> {
    log::info!("encoding...");

    let (graph_bytes, strings) = graph::encode_tree(schema, tree)?;

    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);

    let table = strings.join("\0");
    let table_bytes = table.as_bytes();
    let compressed = compress(table_bytes);
    out.extend_from_slice(&(table_bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    out.extend_from_slice(&compressed);

    out.extend_from_slice(&(graph_bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(&graph_bytes);

    log::debug!("string table: {:>8} bytes", compressed.len());
    log::debug!(" syntax tree: {:>8} bytes", graph_bytes.len());
    log::info!("encoding done, {} bytes total", out.len());
    Ok(out)
}

/// Decodes a container produced by [`encode`] back into a [`Value`]
/// tree.
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Value> {
    log::info!("decoding...");

    if bytes.len() < 4 || bytes[0..4] != MAGIC {
        return Err(Error::Format("not a bonsai-codec container (bad magic)".into()));
    }
    let mut pos = 4;

    let _uncompressed_len = read_u32(bytes, &mut pos)?;
    let compressed_len = read_u32(bytes, &mut pos)? as usize;
    let compressed = read_bytes(bytes, &mut pos, compressed_len)?;
    let table_bytes = decompress(compressed)?;
    let table = String::from_utf8(table_bytes)
        .map_err(|_| Error::Format("string table is not valid UTF-8".into()))?;
    let strings: Vec<String> = table.split('\0').map(|s| s.to_string()).collect();

    let graph_len = read_u32(bytes, &mut pos)? as usize;
    let graph_bytes = read_bytes(bytes, &mut pos, graph_len)?;

    log::debug!("string table: {:>8} bytes", compressed_len);
    log::debug!(" syntax tree: {:>8} bytes", graph_bytes.len());

    let tree = graph::decode_tree(schema, graph_bytes, strings)?;
    log::info!("decoding done");
    Ok(tree)
}

fn read_u32(bytes: &[u8], pos: &mut usize) -> Result<u32> {
    let slice = read_bytes(bytes, pos, 4)?;
    Ok(u32::from_be_bytes(slice.try_into().unwrap()))
}

fn read_bytes<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = pos.checked_add(len).ok_or_else(|| Error::Format("section length overflow".into()))?;
    if end > bytes.len() {
        return Err(Error::Format("truncated section".into()));
    }
    let slice = &bytes[*pos..end];
    *pos = end;
    Ok(slice)
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut input = Cursor::new(data);
    let mut output = Vec::new();
    let params = BrotliEncoderParams::default();
    brotli::BrotliCompress(&mut input, &mut output, &params)
        .expect("in-memory brotli compression cannot fail");
    output
}

fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut input = Cursor::new(data);
    let mut output = Vec::new();
    brotli::BrotliDecompress(&mut input, &mut output)
        .map_err(|e| Error::Format(format!("brotli decompression failed: {e}")))?;
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::shift_es5;
    use crate::value;

    #[test]
    fn roundtrips_a_minimal_script() {
        let schema = shift_es5::schema();
        let json = r#"{"type":"Script","body":{"type":"FunctionBody","directives":[],"statements":[]}}"#;
        let tree = value::from_json(json).unwrap();
        let bytes = encode(schema, &tree).unwrap();
        assert_eq!(&bytes[0..4], &MAGIC);
        let decoded = decode(schema, &bytes).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn rejects_bad_magic() {
        let schema = shift_es5::schema();
        let err = decode(schema, &[0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn rejects_truncated_container() {
        let schema = shift_es5::schema();
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 5]);
        let err = decode(schema, &bytes).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
