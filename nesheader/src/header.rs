use core::fmt;

use nom::{
    sequence::tuple,
    combinator::map,
    bytes::complete::{
        tag,
        take,
    },
    number,
};
use bitfield_struct::bitfield;

use crate::{HEADER_LEN, MAGIC};

#[bitfield(u8, order = Lsb)]
struct Flags6 {
    horizontal_nametable: bool,
    nvram: bool,
    trainer: bool,
    #[bits(1)]
    __: u8,
    #[bits(4)]
    mapper_num_lo: u8,
}

#[bitfield(u8, order = Lsb)]
struct Flags7 {
    #[bits(2)]
    __: u8,
    #[bits(2)]
    nes20: u8,
    #[bits(4)]
    mapper_num_hi: u8,
}

#[bitfield(u8, order = Lsb)]
struct TvSystemRaw {
    pal: bool,
    #[bits(7)]
    __: u8,
}

fn flags6(f: &[u8]) -> nom::IResult<&[u8], Flags6> {
    map(
        number::complete::u8,
        Flags6::from_bits,
    )(f)
}

fn flags7(f: &[u8]) -> nom::IResult<&[u8], Flags7> {
    map(
        number::complete::u8,
        Flags7::from_bits,
    )(f)
}

fn tvsystem(f: &[u8]) -> nom::IResult<&[u8], TvSystemRaw> {
    map(
        number::complete::u8,
        TvSystemRaw::from_bits,
    )(f)
}

fn header_bytes(f: &[u8]) -> nom::IResult<&[u8], &[u8]> {
    take(HEADER_LEN)(f)
}

/// Matches the 4-byte iNES signature at the start of `f`.
pub fn magic(f: &[u8]) -> nom::IResult<&[u8], &[u8]> {
    tag(&MAGIC[..])(f)
}

/// Whether `bytes` starts with `NES\x1a`. Anything shorter than the
/// signature is unheadered.
pub fn is_headered(bytes: &[u8]) -> bool {
    magic(bytes).is_ok()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TvSystem {
    Pal,
    Ntsc,
}

/// Decoded view of the 16 header bytes. Only used for reporting, the
/// stripper never looks past the signature to decide anything.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct INesHeader {
    prg_rom_size: u8,
    chr_rom_size: u8,
    nametable_arrangement: bool,
    nvram: bool,
    trainer: bool,
    mapper: u8,
    nes20: bool,
    prg_ram_size: u8,
    tv_system: TvSystem,
}

impl INesHeader {
    /// PRG-ROM size in bytes.
    pub fn prg_rom_len(&self) -> usize { 0x4000 * self.prg_rom_size as usize }
    /// CHR-ROM size in bytes.
    pub fn chr_rom_len(&self) -> usize { 0x2000 * self.chr_rom_size as usize }
    pub fn mapper(&self) -> u8 { self.mapper }
    pub fn nametable_arrangement(&self) -> bool { self.nametable_arrangement }
    pub fn nvram(&self) -> bool { self.nvram }
    pub fn trainer(&self) -> bool { self.trainer }
    pub fn is_nes20(&self) -> bool { self.nes20 }
    pub fn prg_ram_size(&self) -> u8 { self.prg_ram_size }
    pub fn tvsystem(&self) -> TvSystem { self.tv_system }

    /// Parses a full 16-byte header and returns the bytes after it.
    pub fn parse(f: &[u8]) -> nom::IResult<&[u8], INesHeader> {
        let (rest, raw) = header_bytes(f)?;
        let (_, hdr) = map(
            tuple((
                magic,
                number::complete::u8,
                number::complete::u8,
                flags6,
                flags7,
                number::complete::u8,
                tvsystem,
            )),
            |v| INesHeader {
                prg_rom_size: v.1,
                chr_rom_size: v.2,
                nametable_arrangement: v.3.horizontal_nametable(),
                nvram: v.3.nvram(),
                trainer: v.3.trainer(),
                mapper: v.3.mapper_num_lo() | v.4.mapper_num_hi() << 4,
                nes20: v.4.nes20() == 0x02,
                prg_ram_size: v.5,
                tv_system: if v.6.pal() { TvSystem::Pal } else { TvSystem::Ntsc },
            },
        )(raw)?;
        Ok((rest, hdr))
    }
}

impl fmt::Display for INesHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mapper {}, PRG-ROM {} KiB, CHR-ROM {} KiB, {:?}",
            if self.nes20 { "NES 2.0" } else { "iNES" },
            self.mapper,
            self.prg_rom_len() / 1024,
            self.chr_rom_len() / 1024,
            self.tv_system,
        )?;
        if self.trainer {
            f.write_str(", trainer")?;
        }
        if self.nvram {
            f.write_str(", battery")?;
        }
        Ok(())
    }
}
