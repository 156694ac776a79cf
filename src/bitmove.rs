use crate::{
    defs::{PieceType, Square},
    utils::square_to_string,
};

/// Move encoded into a `u16`
///
/// Bits 0-5 are for the source square,
///
/// Bits 6-11 are for the destination square,
///
/// Bits 12-15 are flags
pub struct BitMove;

impl BitMove {
    pub const fn from_squares(src: Square, dest: Square) -> u16 {
        src as u16 | ((dest as u16) << 6)
    }

    pub const fn from_flag(src: Square, dest: Square, flag: u8) -> u16 {
        BitMove::from_squares(src, dest) | ((flag as u16) << 12)
    }

    pub const fn src(bitmove: u16) -> Square {
        (bitmove & 0b111111) as Square
    }

    pub const fn dest(bitmove: u16) -> Square {
        (bitmove >> 6 & 0b111111) as Square
    }

    pub const fn flag(bitmove: u16) -> u8 {
        (bitmove >> 12) as u8
    }

    pub const fn kind(bitmove: u16) -> MoveKind {
        MoveKind::from_flag(BitMove::flag(bitmove))
    }

    pub const fn is_cap(bitmove: u16) -> bool {
        BitMove::flag(bitmove) & 0b0100 != 0
    }

    pub const fn is_prom(bitmove: u16) -> bool {
        BitMove::flag(bitmove) & 0b1000 != 0
    }

    pub const fn is_ep(bitmove: u16) -> bool {
        BitMove::flag(bitmove) == MoveFlag::EN_PASSANT
    }

    pub const fn is_castle(bitmove: u16) -> bool {
        BitMove::flag(bitmove) == MoveFlag::CASTLE_KING
            || BitMove::flag(bitmove) == MoveFlag::CASTLE_QUEEN
    }

    pub const fn is_tactical(bitmove: u16) -> bool {
        BitMove::is_cap(bitmove) || BitMove::is_prom(bitmove)
    }

    /// No capture, promotion, en passant or castle
    pub const fn is_normal(bitmove: u16) -> bool {
        BitMove::flag(bitmove) & 0b1110 == 0
    }

    pub const fn prom_type(flag: u8) -> PieceType {
        // Remove capture bit
        match flag & 0b1011 {
            MoveFlag::PROMOTE_KNIGHT => PieceType::Knight,
            MoveFlag::PROMOTE_BISHOP => PieceType::Bishop,
            MoveFlag::PROMOTE_ROOK => PieceType::Rook,
            MoveFlag::PROMOTE_QUEEN => PieceType::Queen,
            _ => PieceType::None,
        }
    }

    pub fn pretty_move(bitmove: u16) -> String {
        if bitmove == 0 {
            return "null".to_owned();
        }

        let mut result = square_to_string(BitMove::src(bitmove));
        result.push_str(&square_to_string(BitMove::dest(bitmove)));

        if BitMove::is_prom(bitmove) {
            let prom_str = match BitMove::prom_type(BitMove::flag(bitmove)) {
                PieceType::Knight => "n",
                PieceType::Bishop => "b",
                PieceType::Rook => "r",
                PieceType::Queen => "q",
                _ => "",
            };
            result.push_str(prom_str);
        }

        result
    }
}

/// Bits 0-1 are special flags
///
/// Bit 2 defines a capture
///
/// Bit 3 defines a promotion
///
/// See <https://www.chessprogramming.org/Encoding_Moves#From-To_Based>
pub struct MoveFlag;

#[allow(dead_code)]
impl MoveFlag {
    pub const QUIET: u8 = 0;
    pub const DOUBLE_PAWN_PUSH: u8 = 1;
    pub const CASTLE_KING: u8 = 2;
    pub const CASTLE_QUEEN: u8 = 3;
    pub const CAPTURE: u8 = 4;
    pub const EN_PASSANT: u8 = 5;
    pub const PROMOTE_KNIGHT: u8 = 8;
    pub const PROMOTE_BISHOP: u8 = 9;
    pub const PROMOTE_ROOK: u8 = 10;
    pub const PROMOTE_QUEEN: u8 = 11;
    pub const PROMOTE_KNIGHT_CAPTURE: u8 = 12;
    pub const PROMOTE_BISHOP_CAPTURE: u8 = 13;
    pub const PROMOTE_ROOK_CAPTURE: u8 = 14;
    pub const PROMOTE_QUEEN_CAPTURE: u8 = 15;
}

/// Decoded move shape, used where matching beats bit tests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    DoublePawnPush,
    CastleKing,
    CastleQueen,
    Capture,
    EnPassant,
    Promotion(PieceType),
    PromotionCapture(PieceType),
}

impl MoveKind {
    pub const fn from_flag(flag: u8) -> Self {
        match flag {
            MoveFlag::DOUBLE_PAWN_PUSH => MoveKind::DoublePawnPush,
            MoveFlag::CASTLE_KING => MoveKind::CastleKing,
            MoveFlag::CASTLE_QUEEN => MoveKind::CastleQueen,
            MoveFlag::CAPTURE => MoveKind::Capture,
            MoveFlag::EN_PASSANT => MoveKind::EnPassant,
            MoveFlag::PROMOTE_KNIGHT => MoveKind::Promotion(PieceType::Knight),
            MoveFlag::PROMOTE_BISHOP => MoveKind::Promotion(PieceType::Bishop),
            MoveFlag::PROMOTE_ROOK => MoveKind::Promotion(PieceType::Rook),
            MoveFlag::PROMOTE_QUEEN => MoveKind::Promotion(PieceType::Queen),
            MoveFlag::PROMOTE_KNIGHT_CAPTURE => MoveKind::PromotionCapture(PieceType::Knight),
            MoveFlag::PROMOTE_BISHOP_CAPTURE => MoveKind::PromotionCapture(PieceType::Bishop),
            MoveFlag::PROMOTE_ROOK_CAPTURE => MoveKind::PromotionCapture(PieceType::Rook),
            MoveFlag::PROMOTE_QUEEN_CAPTURE => MoveKind::PromotionCapture(PieceType::Queen),
            _ => MoveKind::Quiet,
        }
    }

    pub const fn to_flag(self) -> u8 {
        match self {
            MoveKind::Quiet => MoveFlag::QUIET,
            MoveKind::DoublePawnPush => MoveFlag::DOUBLE_PAWN_PUSH,
            MoveKind::CastleKing => MoveFlag::CASTLE_KING,
            MoveKind::CastleQueen => MoveFlag::CASTLE_QUEEN,
            MoveKind::Capture => MoveFlag::CAPTURE,
            MoveKind::EnPassant => MoveFlag::EN_PASSANT,
            MoveKind::Promotion(PieceType::Knight) => MoveFlag::PROMOTE_KNIGHT,
            MoveKind::Promotion(PieceType::Bishop) => MoveFlag::PROMOTE_BISHOP,
            MoveKind::Promotion(PieceType::Rook) => MoveFlag::PROMOTE_ROOK,
            MoveKind::Promotion(_) => MoveFlag::PROMOTE_QUEEN,
            MoveKind::PromotionCapture(PieceType::Knight) => MoveFlag::PROMOTE_KNIGHT_CAPTURE,
            MoveKind::PromotionCapture(PieceType::Bishop) => MoveFlag::PROMOTE_BISHOP_CAPTURE,
            MoveKind::PromotionCapture(PieceType::Rook) => MoveFlag::PROMOTE_ROOK_CAPTURE,
            MoveKind::PromotionCapture(_) => MoveFlag::PROMOTE_QUEEN_CAPTURE,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_decode() {
        // e2e4 double push: e2 = 52, e4 = 36
        let m = BitMove::from_flag(52, 36, MoveFlag::DOUBLE_PAWN_PUSH);
        assert_eq!(BitMove::src(m), 52);
        assert_eq!(BitMove::dest(m), 36);
        assert_eq!(BitMove::kind(m), MoveKind::DoublePawnPush);
        assert!(!BitMove::is_cap(m));
        assert_eq!(BitMove::pretty_move(m), "e2e4");
    }

    #[test]
    fn flag_kind_round_trip() {
        for flag in 0..16 {
            // 6 and 7 are unused encodings
            if flag == 6 || flag == 7 {
                continue;
            }
            assert_eq!(MoveKind::from_flag(flag).to_flag(), flag);
        }
    }

    #[test]
    fn promotion_bits() {
        let m = BitMove::from_flag(8, 0, MoveFlag::PROMOTE_QUEEN_CAPTURE);
        assert!(BitMove::is_prom(m));
        assert!(BitMove::is_cap(m));
        assert!(BitMove::is_tactical(m));
        assert_eq!(BitMove::prom_type(BitMove::flag(m)), PieceType::Queen);
        assert_eq!(BitMove::pretty_move(m), "a7a8q");
    }
}
