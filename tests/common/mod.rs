#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::{DeflateEncoder, ZlibEncoder};

pub const END: u8 = 0;
pub const BYTE: u8 = 1;
pub const SHORT: u8 = 2;
pub const INT: u8 = 3;
pub const LONG: u8 = 4;
pub const FLOAT: u8 = 5;
pub const DOUBLE: u8 = 6;
pub const BYTE_ARRAY: u8 = 7;
pub const STRING: u8 = 8;
pub const LIST: u8 = 9;
pub const COMPOUND: u8 = 10;
pub const INT_ARRAY: u8 = 11;
pub const LONG_ARRAY: u8 = 12;

/// Hand-assembles a tag stream. Names and payloads are written verbatim.
#[derive(Default)]
pub struct TagWriter {
    buf: Vec<u8>,
}

impl TagWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a stream with the unnamed root compound header.
    pub fn root() -> Self {
        let mut writer = Self::new();
        writer.buf.extend_from_slice(&[COMPOUND, 0, 0]);
        writer
    }

    pub fn header(&mut self, kind: u8, name: &str) -> &mut Self {
        self.buf.push(kind);
        self.buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(name.as_bytes());
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn byte(&mut self, name: &str, v: i8) -> &mut Self {
        self.header(BYTE, name).raw(&v.to_be_bytes())
    }

    pub fn short(&mut self, name: &str, v: i16) -> &mut Self {
        self.header(SHORT, name).raw(&v.to_be_bytes())
    }

    pub fn int(&mut self, name: &str, v: i32) -> &mut Self {
        self.header(INT, name).raw(&v.to_be_bytes())
    }

    pub fn long(&mut self, name: &str, v: i64) -> &mut Self {
        self.header(LONG, name).raw(&v.to_be_bytes())
    }

    pub fn float(&mut self, name: &str, v: f32) -> &mut Self {
        self.header(FLOAT, name).raw(&v.to_be_bytes())
    }

    pub fn double(&mut self, name: &str, v: f64) -> &mut Self {
        self.header(DOUBLE, name).raw(&v.to_be_bytes())
    }

    pub fn string(&mut self, name: &str, v: &str) -> &mut Self {
        self.header(STRING, name).string_payload(v)
    }

    pub fn string_payload(&mut self, v: &str) -> &mut Self {
        self.raw(&(v.len() as u16).to_be_bytes()).raw(v.as_bytes())
    }

    pub fn byte_array(&mut self, name: &str, v: &[i8]) -> &mut Self {
        self.header(BYTE_ARRAY, name)
            .raw(&(v.len() as i32).to_be_bytes());
        for b in v {
            self.raw(&b.to_be_bytes());
        }
        self
    }

    pub fn int_array(&mut self, name: &str, v: &[i32]) -> &mut Self {
        self.header(INT_ARRAY, name)
            .raw(&(v.len() as i32).to_be_bytes());
        for i in v {
            self.raw(&i.to_be_bytes());
        }
        self
    }

    pub fn long_array(&mut self, name: &str, v: &[i64]) -> &mut Self {
        self.header(LONG_ARRAY, name)
            .raw(&(v.len() as i32).to_be_bytes());
        for l in v {
            self.raw(&l.to_be_bytes());
        }
        self
    }

    pub fn begin_compound(&mut self, name: &str) -> &mut Self {
        self.header(COMPOUND, name)
    }

    /// Writes a list header; the caller appends `count` unnamed payloads.
    pub fn begin_list(&mut self, name: &str, element_kind: u8, count: i32) -> &mut Self {
        self.header(LIST, name)
            .raw(&[element_kind])
            .raw(&count.to_be_bytes())
    }

    pub fn end(&mut self) -> &mut Self {
        self.raw(&[END])
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

/// A palette entry for [`chunk_record`]: name plus property pairs.
pub type PaletteEntry<'a> = (&'a str, &'a [(&'a str, &'a str)]);

/// A section for [`chunk_record`]: Y, palette, packed words.
pub type SectionSpec<'a> = (i8, &'a [PaletteEntry<'a>], Vec<i64>);

/// Builds a chunk record stream with `Level.xPos/zPos/Sections`.
pub fn chunk_record(x_pos: i32, z_pos: i32, sections: &[SectionSpec]) -> Vec<u8> {
    let mut w = TagWriter::root();
    w.int("DataVersion", 2230);
    w.begin_compound("Level");
    w.int("xPos", x_pos).int("zPos", z_pos);
    w.string("Status", "full");
    w.begin_list("Sections", COMPOUND, sections.len() as i32);
    for (y, palette, words) in sections {
        w.byte("Y", *y);
        w.begin_list("Palette", COMPOUND, palette.len() as i32);
        for (name, properties) in palette.iter() {
            w.string("Name", name);
            if !properties.is_empty() {
                w.begin_compound("Properties");
                for (key, value) in properties.iter() {
                    w.string(key, value);
                }
                w.end();
            }
            w.end();
        }
        w.long_array("BlockStates", words);
        w.end();
    }
    w.end(); // Level
    w.end(); // root
    w.bytes()
}

pub fn zlib(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

pub fn raw_deflate(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

struct PendingRecord {
    x: u8,
    z: u8,
    method: u8,
    payload: Vec<u8>,
    timestamp: u32,
}

/// Lays out a region archive: directory, timestamps, then sector-aligned records.
#[derive(Default)]
pub struct RegionBuilder {
    records: Vec<PendingRecord>,
}

impl RegionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record whose payload is already compressed (or deliberately not).
    pub fn raw_record(mut self, x: u8, z: u8, method: u8, payload: Vec<u8>) -> Self {
        self.records.push(PendingRecord {
            x,
            z,
            method,
            payload,
            timestamp: 1_600_000_000 + u32::from(x) + 32 * u32::from(z),
        });
        self
    }

    /// Adds a zlib-compressed record (method 2) holding `stream`.
    pub fn record(self, x: u8, z: u8, stream: &[u8]) -> Self {
        self.raw_record(x, z, 2, zlib(stream))
    }

    pub fn build(self) -> Vec<u8> {
        let mut data = vec![0u8; 8192];
        for record in self.records {
            let sector = data.len() / 4096;
            let mut body = Vec::new();
            body.extend_from_slice(&(record.payload.len() as u32 + 1).to_be_bytes());
            body.push(record.method);
            body.extend_from_slice(&record.payload);
            let sectors = body.len().div_ceil(4096);
            body.resize(sectors * 4096, 0);

            let entry = 4 * (record.x as usize + 32 * record.z as usize);
            data[entry] = (sector >> 16) as u8;
            data[entry + 1] = (sector >> 8) as u8;
            data[entry + 2] = sector as u8;
            data[entry + 3] = sectors as u8;
            data[4096 + entry..4096 + entry + 4].copy_from_slice(&record.timestamp.to_be_bytes());
            data.extend_from_slice(&body);
        }
        data
    }
}

/// Reference packer: the inverse of the unpacker's bit layout.
pub fn pack(indices: &[u32], bit_width: u32) -> Vec<i64> {
    let word_count = (indices.len() * bit_width as usize).div_ceil(64);
    let mut words = vec![0u64; word_count];
    for (i, &index) in indices.iter().enumerate() {
        let start = i * bit_width as usize;
        let word = start / 64;
        let shift = (start % 64) as u32;
        words[word] |= u64::from(index) << shift;
        if shift + bit_width > 64 {
            words[word + 1] |= u64::from(index) >> (64 - shift);
        }
    }
    words.into_iter().map(|w| w as i64).collect()
}

/// Deterministic pseudo-random indices in `0..n`.
pub fn pseudo_random_indices(n: u32, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..4096)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % u64::from(n)) as u32
        })
        .collect()
}
