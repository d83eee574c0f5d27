//! Applying `key = value` overrides to a [`Variant`].

use std::collections::{BTreeMap, BTreeSet};

use alembic_core::{
    Bitboard, BoardExtent, Color, Piece, PieceChars, PieceSet, PieceType, PotionType, Square,
};

use crate::error::VariantError;
use crate::variant::{GameValue, Variant};

/// Raw attributes of one configuration section, last assignment wins.
pub type Config = BTreeMap<String, String>;

/// Applies a section's attributes on top of a base variant.
///
/// Unknown keys and unparsable values are reported and otherwise ignored,
/// so an invalid override leaves the inherited value in place.
pub struct VariantParser<'a> {
    name: &'a str,
    attribs: &'a Config,
}

impl<'a> VariantParser<'a> {
    pub fn new(name: &'a str, attribs: &'a Config) -> Self {
        Self { name, attribs }
    }

    /// Apply the attributes to `base`, returning the result and diagnostics.
    pub fn parse(&self, base: Variant) -> (Variant, Vec<VariantError>) {
        let mut session = Session {
            attribs: self.attribs,
            used: BTreeSet::new(),
            errors: Vec::new(),
        };
        let mut v = base;

        session.apply(&mut v);

        for key in self.attribs.keys() {
            if !session.used.contains(key.as_str()) {
                session.errors.push(VariantError::UnknownKey {
                    variant: self.name.to_string(),
                    key: key.clone(),
                });
            }
        }
        (v, session.errors)
    }
}

struct Session<'a> {
    attribs: &'a Config,
    used: BTreeSet<&'a str>,
    errors: Vec<VariantError>,
}

impl<'a> Session<'a> {
    fn value(&mut self, key: &str) -> Option<&'a str> {
        let (key, value) = self.attribs.get_key_value(key)?;
        self.used.insert(key.as_str());
        Some(value.as_str())
    }

    /// Parse `key` with `parse` into `target`, reporting values it rejects.
    fn field<T>(&mut self, key: &str, target: &mut T, parse: impl FnOnce(&str) -> Option<T>) {
        let Some(value) = self.value(key) else {
            return;
        };
        match parse(value) {
            Some(parsed) => *target = parsed,
            None => self.errors.push(VariantError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn apply(&mut self, v: &mut Variant) {
        self.field("variantTemplate", &mut v.variant_template, |s| Some(s.to_string()));
        self.field("nnueAlias", &mut v.nnue_alias, |s| Some(s.to_string()));

        self.field("maxFile", &mut v.extent.max_file, parse_file);
        self.field("maxRank", &mut v.extent.max_rank, parse_rank);

        self.apply_pieces(v);
        self.field("startFen", &mut v.start_fen, |s| Some(s.to_string()));
        self.field("kingType", &mut v.king_type, PieceType::from_name);

        for (key, target) in [
            ("pieceDrops", &mut v.piece_drops),
            ("capturesToHand", &mut v.captures_to_hand),
            ("mustDrop", &mut v.must_drop),
            ("gating", &mut v.seirawan_gating),
            ("potions", &mut v.potions),
            ("potionDropOnOccupied", &mut v.potion_drop_on_occupied),
            ("doubleStep", &mut v.double_step),
            ("materialCounting", &mut v.material_counting),
            ("mustCapture", &mut v.must_capture),
            ("checkCounting", &mut v.check_counting),
            ("makpongRule", &mut v.makpong_rule),
            ("connectHorizontal", &mut v.connect_horizontal),
            ("connectVertical", &mut v.connect_vertical),
            ("connectDiagonal", &mut v.connect_diagonal),
            ("blastOnCapture", &mut v.blast_on_capture),
            ("twoBoards", &mut v.two_boards),
            ("flipEnclosedPieces", &mut v.flip_enclosed_pieces),
        ] {
            self.field(key, target, parse_bool);
        }

        let chars = v.piece_chars.clone();
        for potion in PotionType::ALL {
            let i = potion.index();
            self.field(&format!("{}Potion", potion.name()), &mut v.potion_piece[i], |s| {
                match s {
                    "-" => Some(None),
                    _ => single_char(s).and_then(|c| chars.piece_of(c)).map(|p| Some(p.kind())),
                }
            });
            self.field(
                &format!("{}PotionCooldown", potion.name()),
                &mut v.potion_cooldown[i],
                |s| s.parse().ok(),
            );
        }

        self.apply_promotions(v, &chars);
        self.apply_regions(v);

        self.field("extinctionValue", &mut v.extinction_value, |s| match s {
            "none" => Some(None),
            _ => parse_game_value(s).map(Some),
        });
        self.field("checkmateValue", &mut v.checkmate_value, parse_game_value);
        self.field("stalemateValue", &mut v.stalemate_value, parse_game_value);
        self.field("extinctionPieceCount", &mut v.extinction_piece_count, |s| s.parse().ok());
        self.field("connectN", &mut v.connect_n, |s| s.parse().ok());
        for (key, target) in [
            ("extinctionPieceTypes", &mut v.extinction_piece_types),
            ("connectPieceTypes", &mut v.connect_piece_types),
            ("petrifyOnCaptureTypes", &mut v.petrify_on_capture_types),
        ] {
            self.field(key, target, |s| parse_piece_set(s, &chars));
        }
    }

    /// Piece definitions by name, then character table overrides.
    fn apply_pieces(&mut self, v: &mut Variant) {
        for pt in PieceType::ALL {
            let key = pt.name();
            let Some(value) = self.value(key) else {
                continue;
            };
            match value {
                "-" => v.remove_piece(pt),
                // custom pieces may carry a movement definition after the char
                _ => match value.chars().next().filter(char::is_ascii_alphabetic) {
                    Some(c) => v.add_piece(pt, c),
                    None => self.errors.push(VariantError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    }),
                },
            }
        }

        let synonyms: Vec<_> = v.piece_chars.synonyms().collect();
        self.field("pieceToCharTable", &mut v.piece_chars, |s| {
            let mut chars = PieceChars::from_table(s)?;
            for (c, piece) in synonyms {
                chars.add_synonym(c, piece);
            }
            Some(chars)
        });

        if let Some(value) = self.value("pieceToCharSynonyms") {
            let table: Vec<char> = value.chars().collect();
            if table.len() == Piece::COUNT {
                for (index, &c) in table.iter().enumerate() {
                    if let Some(piece) = Piece::from_index(index).filter(|_| c != '.') {
                        v.piece_chars.add_synonym(c, piece);
                    }
                }
            } else {
                self.errors.push(VariantError::InvalidValue {
                    key: "pieceToCharSynonyms".to_string(),
                    value: value.to_string(),
                });
            }
        }
    }

    fn apply_promotions(&mut self, v: &mut Variant, chars: &PieceChars) {
        for (key, targets) in [
            ("promotionPawnTypes", &mut v.promotion_pawn_types),
            ("promotionPieceTypes", &mut v.promotion_piece_types),
        ] {
            let mut both = None;
            self.field(key, &mut both, |s| parse_piece_set(s, chars).map(Some));
            if let Some(set) = both {
                *targets = [set; Color::COUNT];
            }
            for color in Color::ALL {
                let key = format!("{key}{}", color.key_suffix());
                self.field(&key, &mut targets[color.index()], |s| parse_piece_set(s, chars));
            }
        }

        self.field("promotedPieceType", &mut v.promoted_piece_type, |s| {
            let mut promoted = [None; PieceType::COUNT];
            for token in s.split_whitespace() {
                let (from, to) = token.split_once(':')?;
                let from = chars.piece_of(single_char(from)?)?.kind();
                let to = chars.piece_of(single_char(to)?)?.kind();
                promoted[from.index()] = Some(to);
            }
            Some(promoted)
        });
    }

    fn apply_regions(&mut self, v: &mut Variant) {
        let extent = v.extent;
        for color in Color::ALL {
            let suffix = color.key_suffix();
            let c = color.index();
            self.field(
                &format!("doubleStepRegion{suffix}"),
                &mut v.double_step_region[c],
                |s| parse_region(s, extent),
            );
            self.field(&format!("flagRegion{suffix}"), &mut v.flag_region[c], |s| {
                parse_region(s, extent)
            });
            self.field(&format!("connectRegion{suffix}"), &mut v.connect_region[c], |s| {
                parse_region(s, extent)
            });
            for pt in PieceType::ALL {
                let key = format!("mobilityRegion{suffix}{}", pt.capitalized_name());
                self.field(&key, &mut v.mobility_region[c][pt.index()], |s| match s {
                    "-" => Some(None),
                    _ => parse_region(s, extent).map(Some),
                });
            }
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// A file letter (`h`) or a file count (`8`), as the 0-based highest file.
fn parse_file(s: &str) -> Option<u8> {
    match single_char(s) {
        Some(c @ 'a'..='z') => Some(c as u8 - b'a'),
        _ => s.parse::<u8>().ok()?.checked_sub(1),
    }
}

/// A rank count (`8`), as the 0-based highest rank.
fn parse_rank(s: &str) -> Option<u8> {
    s.parse::<u8>().ok()?.checked_sub(1)
}

fn parse_game_value(s: &str) -> Option<GameValue> {
    match s {
        "win" => Some(GameValue::Win),
        "loss" => Some(GameValue::Loss),
        "draw" => Some(GameValue::Draw),
        _ => None,
    }
}

/// Piece characters of either case, `*` for every type, `-` for none.
fn parse_piece_set(s: &str, chars: &PieceChars) -> Option<PieceSet> {
    match s {
        "*" => Some(!PieceSet::EMPTY),
        "-" | "" => Some(PieceSet::EMPTY),
        _ => s
            .chars()
            .map(|c| chars.piece_of(c).map(Piece::kind))
            .collect::<Option<PieceSet>>(),
    }
}

/// Space-separated squares: `e4`, whole ranks `*4`, whole files `e*`, or
/// the whole board `*`. The result is clipped to the board.
fn parse_region(s: &str, extent: BoardExtent) -> Option<Bitboard> {
    let mut region = Bitboard::EMPTY;
    for token in s.split_whitespace() {
        region |= match token.split_at_checked(1)? {
            ("*", "") => Bitboard::FULL,
            ("*", rank) => Bitboard::rank_mask(parse_rank(rank).filter(|&r| r < Square::RANK_NB)?),
            (file, "*") => Bitboard::file_mask(parse_file(file).filter(|&f| f < Square::FILE_NB)?),
            _ => Square::from_algebraic(token)?.bitboard(),
        };
    }
    Some(region & extent.mask())
}
