//! Tagged-value (NBT) stream decoding.
//!
//! # Stream Structure
//! ```text
//! [1 byte]  kind = 0x0a (compound)
//! [2 bytes] name length = 0
//! tags...   each: [1 byte kind][2 byte name length][name][payload]
//! [1 byte]  kind = 0x00 (end of root compound)
//! ```
//!
//! All multi-byte numbers are big-endian two's complement. List elements
//! carry neither kind nor name; the list header states both once.
//!
//! Decoding is a single forward pass with one cursor private to the call.
//! Open compounds and lists live on an explicit stack rather than the call
//! stack; nesting is bounded by [`DecodeOptions::max_depth`].

use byteorder::{BigEndian, ByteOrder};
use indexmap::map::Entry;
use log::{debug, trace};

use crate::anvil::types::error::{AnvilError, Result};
use crate::anvil::types::models::{DecodeOptions, TagKind};
use crate::anvil::types::value::{Compound, List, Value};
use crate::anvil::utils::ByteCursor;

/// Decodes a complete tag stream with the default options.
///
/// # Errors
/// - `InvalidRoot` if the stream does not open with an unnamed compound
/// - `InvalidTagKind` for an unknown kind byte or a non-empty list of `End`
/// - `UnexpectedEnd` if any read runs past the input
/// - `NestingTooDeep` beyond 512 levels
/// - `InvalidUtf8` for a string payload that is not UTF-8
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decodes a complete tag stream using the given options.
pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let mut decoder = TagDecoder {
        cursor: ByteCursor::new(bytes),
        max_depth: options.max_depth,
    };
    let root = decoder.read_root()?;
    if !decoder.cursor.is_empty() {
        debug!(
            "Ignoring {} trailing bytes after root compound",
            decoder.cursor.remaining()
        );
    }
    Ok(root)
}

struct TagDecoder<'a> {
    cursor: ByteCursor<'a>,
    max_depth: usize,
}

/// A compound or list that is still being filled.
///
/// Nesting is tracked on an explicit stack of these, so the decoder's own
/// call depth stays constant however deep the stream nests.
enum Frame {
    Compound {
        tags: Compound,
        /// Name of the nested compound or list currently open below this one.
        pending: Option<String>,
    },
    List {
        element_kind: TagKind,
        remaining: usize,
        elements: Vec<Value>,
    },
}

fn is_container(kind: TagKind) -> bool {
    matches!(kind, TagKind::Compound | TagKind::List)
}

fn insert_tag(tags: &mut Compound, name: String, value: Value) -> Result<()> {
    match tags.entry(name) {
        Entry::Occupied(entry) => Err(AnvilError::DuplicateName(entry.key().clone())),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

impl<'a> TagDecoder<'a> {
    fn read_root(&mut self) -> Result<Value> {
        if self.cursor.read_u8()? != TagKind::Compound.code() {
            return Err(AnvilError::InvalidRoot);
        }
        if self.cursor.read_u16()? != 0 {
            return Err(AnvilError::InvalidRoot);
        }
        self.check_depth(1)?;
        let mut stack = vec![Frame::Compound {
            tags: Compound::new(),
            pending: None,
        }];

        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                return Err(AnvilError::InvalidRoot);
            };

            // The kind of a container to open next, or `None` to close `frame`.
            let opening = match frame {
                Frame::Compound { tags, pending } => {
                    let kind = TagKind::try_from(self.cursor.read_u8()?)?;
                    if kind == TagKind::End {
                        None
                    } else {
                        let name = self.read_name()?;
                        trace!("Tag {:?} ({}) at depth {}", name, kind, depth);
                        if is_container(kind) {
                            *pending = Some(name);
                            Some(kind)
                        } else {
                            let value = self.read_scalar(kind)?;
                            insert_tag(tags, name, value)?;
                            continue;
                        }
                    }
                }
                Frame::List {
                    element_kind,
                    remaining,
                    elements,
                } => {
                    if *remaining == 0 {
                        None
                    } else {
                        *remaining -= 1;
                        if is_container(*element_kind) {
                            Some(*element_kind)
                        } else {
                            elements.push(self.read_scalar(*element_kind)?);
                            continue;
                        }
                    }
                }
            };

            if let Some(kind) = opening {
                self.check_depth(depth + 1)?;
                stack.push(self.open_frame(kind)?);
                continue;
            }

            let closed = match stack.pop() {
                Some(Frame::Compound { tags, .. }) => Value::Compound(tags),
                Some(Frame::List {
                    element_kind,
                    elements,
                    ..
                }) => Value::List(List::new(element_kind, elements)),
                None => return Err(AnvilError::InvalidRoot),
            };
            match stack.last_mut() {
                None => {
                    trace!("Root compound decoded: {} bytes", self.cursor.offset());
                    return Ok(closed);
                }
                Some(Frame::Compound { tags, pending }) => {
                    let name = pending.take().unwrap_or_default();
                    insert_tag(tags, name, closed)?;
                }
                Some(Frame::List { elements, .. }) => elements.push(closed),
            }
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(AnvilError::NestingTooDeep(self.max_depth));
        }
        Ok(())
    }

    /// Starts a compound, or reads a list header and starts the list.
    fn open_frame(&mut self, kind: TagKind) -> Result<Frame> {
        if kind == TagKind::Compound {
            return Ok(Frame::Compound {
                tags: Compound::new(),
                pending: None,
            });
        }
        let element_kind = TagKind::try_from(self.cursor.read_u8()?)?;
        let count = self.read_length("list")?;
        if element_kind == TagKind::End && count > 0 {
            return Err(AnvilError::InvalidTagKind(TagKind::End.code()));
        }

        // Each element takes at least one byte, so this bounds the allocation.
        Ok(Frame::List {
            element_kind,
            remaining: count,
            elements: Vec::with_capacity(count.min(self.cursor.remaining())),
        })
    }

    /// Reads the payload of a non-container tag whose kind is already known.
    fn read_scalar(&mut self, kind: TagKind) -> Result<Value> {
        let value = match kind {
            TagKind::End | TagKind::List | TagKind::Compound => {
                return Err(AnvilError::InvalidTagKind(kind.code()));
            }
            TagKind::Byte => Value::Byte(self.cursor.read_i8()?),
            TagKind::Short => Value::Short(self.cursor.read_i16()?),
            TagKind::Int => Value::Int(self.cursor.read_i32()?),
            TagKind::Long => Value::Long(self.cursor.read_i64()?),
            TagKind::Float => Value::Float(self.cursor.read_f32()?),
            TagKind::Double => Value::Double(self.cursor.read_f64()?),
            TagKind::ByteArray => {
                let len = self.read_length("byte array")?;
                let bytes = self.cursor.take(len)?;
                Value::ByteArray(bytes.iter().map(|&b| b as i8).collect())
            }
            TagKind::String => Value::String(self.read_string()?),
            TagKind::IntArray => {
                let len = self.read_length("int array")?;
                let byte_len = self.cursor.ensure(len, 4)?;
                let mut ints = vec![0i32; len];
                BigEndian::read_i32_into(self.cursor.take(byte_len)?, &mut ints);
                Value::IntArray(ints)
            }
            TagKind::LongArray => {
                let len = self.read_length("long array")?;
                let byte_len = self.cursor.ensure(len, 8)?;
                let mut longs = vec![0i64; len];
                BigEndian::read_i64_into(self.cursor.take(byte_len)?, &mut longs);
                Value::LongArray(longs)
            }
        };
        Ok(value)
    }

    /// Reads a signed 32-bit element count.
    fn read_length(&mut self, context: &'static str) -> Result<usize> {
        let length = self.cursor.read_i32()?;
        usize::try_from(length).map_err(|_| AnvilError::NegativeLength { context, length })
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.cursor.read_u16()? as usize;
        let bytes = self.cursor.take(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Tag names are taken as-is; invalid sequences become U+FFFD.
    fn read_name(&mut self) -> Result<String> {
        let len = self.cursor.read_u16()? as usize;
        let bytes = self.cursor.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
