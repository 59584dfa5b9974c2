//! Matroska / WebM element ids and the schema table built from them.
//!
//! Levels follow the Matroska element hierarchy: the EBML header and the
//! Segment sit at level 0, the Segment's direct children at level 1, and
//! so on. Void and CRC-32 are global (level -1).

use crate::kind::ElementKind::{Binary, Date, Float, Integer, Master, String, UInteger, Utf8};
use crate::type_info::ElementTypeInfo;

// =============================================================================
// EBML header
// =============================================================================

pub const EBML: u32 = 0x1A45_DFA3;
pub const EBML_VERSION: u32 = 0x4286;
pub const EBML_READ_VERSION: u32 = 0x42F7;
pub const EBML_MAX_ID_LENGTH: u32 = 0x42F2;
pub const EBML_MAX_SIZE_LENGTH: u32 = 0x42F3;
pub const DOC_TYPE: u32 = 0x4282;
pub const DOC_TYPE_VERSION: u32 = 0x4287;
pub const DOC_TYPE_READ_VERSION: u32 = 0x4285;

// =============================================================================
// Global elements
// =============================================================================

/// Padding, legal at any depth.
pub const VOID: u32 = 0xEC;
/// Checksum of the parent's other children, legal at any depth.
pub const CRC_32: u32 = 0xBF;

// =============================================================================
// Segment and meta seek
// =============================================================================

/// Root container of all Matroska data. Live muxers write it with
/// unknown length.
pub const SEGMENT: u32 = 0x1853_8067;
pub const SEEK_HEAD: u32 = 0x114D_9B74;
pub const SEEK: u32 = 0x4DBB;
pub const SEEK_ID: u32 = 0x53AB;
pub const SEEK_POSITION: u32 = 0x53AC;

// =============================================================================
// Segment information
// =============================================================================

pub const INFO: u32 = 0x1549_A966;
pub const SEGMENT_UID: u32 = 0x73A4;
pub const SEGMENT_FILENAME: u32 = 0x7384;
pub const PREV_UID: u32 = 0x3C_B923;
pub const PREV_FILENAME: u32 = 0x3C_83AB;
pub const NEXT_UID: u32 = 0x3E_B923;
pub const NEXT_FILENAME: u32 = 0x3E_83BB;
pub const SEGMENT_FAMILY: u32 = 0x4444;
/// Nanoseconds per timecode unit (default 1 000 000).
pub const TIMECODE_SCALE: u32 = 0x2A_D7B1;
pub const DURATION: u32 = 0x4489;
pub const DATE_UTC: u32 = 0x4461;
pub const TITLE: u32 = 0x7BA9;
pub const MUXING_APP: u32 = 0x4D80;
pub const WRITING_APP: u32 = 0x5741;

// =============================================================================
// Cluster
// =============================================================================

pub const CLUSTER: u32 = 0x1F43_B675;
pub const TIMECODE: u32 = 0xE7;
pub const SILENT_TRACKS: u32 = 0x5854;
pub const SILENT_TRACK_NUMBER: u32 = 0x58D7;
pub const POSITION: u32 = 0xA7;
pub const PREV_SIZE: u32 = 0xAB;
/// The leaf whose payload is decoded as a [`Frame`](crate::Frame).
pub const SIMPLE_BLOCK: u32 = 0xA3;
pub const BLOCK_GROUP: u32 = 0xA0;
pub const BLOCK: u32 = 0xA1;
pub const BLOCK_ADDITIONS: u32 = 0x75A1;
pub const BLOCK_MORE: u32 = 0xA6;
pub const BLOCK_ADD_ID: u32 = 0xEE;
pub const BLOCK_ADDITIONAL: u32 = 0xA5;
pub const BLOCK_DURATION: u32 = 0x9B;
pub const REFERENCE_PRIORITY: u32 = 0xFA;
pub const REFERENCE_BLOCK: u32 = 0xFB;
pub const CODEC_STATE: u32 = 0xA4;
pub const DISCARD_PADDING: u32 = 0x75A2;

// =============================================================================
// Tracks
// =============================================================================

pub const TRACKS: u32 = 0x1654_AE6B;
pub const TRACK_ENTRY: u32 = 0xAE;
pub const TRACK_NUMBER: u32 = 0xD7;
pub const TRACK_UID: u32 = 0x73C5;
pub const TRACK_TYPE: u32 = 0x83;
pub const FLAG_ENABLED: u32 = 0xB9;
pub const FLAG_DEFAULT: u32 = 0x88;
pub const FLAG_FORCED: u32 = 0x55AA;
pub const FLAG_LACING: u32 = 0x9C;
pub const MIN_CACHE: u32 = 0x6DE7;
pub const MAX_CACHE: u32 = 0x6DF8;
pub const DEFAULT_DURATION: u32 = 0x23_E383;
pub const MAX_BLOCK_ADDITION_ID: u32 = 0x55EE;
pub const NAME: u32 = 0x536E;
pub const LANGUAGE: u32 = 0x22_B59C;
pub const CODEC_ID: u32 = 0x86;
pub const CODEC_PRIVATE: u32 = 0x63A2;
pub const CODEC_NAME: u32 = 0x25_8688;
pub const CODEC_DELAY: u32 = 0x56AA;
pub const SEEK_PRE_ROLL: u32 = 0x56BB;

pub const VIDEO: u32 = 0xE0;
pub const FLAG_INTERLACED: u32 = 0x9A;
pub const PIXEL_WIDTH: u32 = 0xB0;
pub const PIXEL_HEIGHT: u32 = 0xBA;
pub const PIXEL_CROP_BOTTOM: u32 = 0x54AA;
pub const PIXEL_CROP_TOP: u32 = 0x54BB;
pub const PIXEL_CROP_LEFT: u32 = 0x54CC;
pub const PIXEL_CROP_RIGHT: u32 = 0x54DD;
pub const DISPLAY_WIDTH: u32 = 0x54B0;
pub const DISPLAY_HEIGHT: u32 = 0x54BA;
pub const DISPLAY_UNIT: u32 = 0x54B2;
pub const ASPECT_RATIO_TYPE: u32 = 0x54B3;
pub const FRAME_RATE: u32 = 0x23_83E3;

pub const AUDIO: u32 = 0xE1;
pub const SAMPLING_FREQUENCY: u32 = 0xB5;
pub const OUTPUT_SAMPLING_FREQUENCY: u32 = 0x78B5;
pub const CHANNELS: u32 = 0x9F;
pub const BIT_DEPTH: u32 = 0x6264;

// =============================================================================
// Cues
// =============================================================================

pub const CUES: u32 = 0x1C53_BB6B;
pub const CUE_POINT: u32 = 0xBB;
pub const CUE_TIME: u32 = 0xB3;
pub const CUE_TRACK_POSITIONS: u32 = 0xB7;
pub const CUE_TRACK: u32 = 0xF7;
pub const CUE_CLUSTER_POSITION: u32 = 0xF1;
pub const CUE_RELATIVE_POSITION: u32 = 0xF0;
pub const CUE_DURATION: u32 = 0xB2;
pub const CUE_BLOCK_NUMBER: u32 = 0x5378;

// =============================================================================
// Attachments
// =============================================================================

pub const ATTACHMENTS: u32 = 0x1941_A469;
pub const ATTACHED_FILE: u32 = 0x61A7;
pub const FILE_DESCRIPTION: u32 = 0x467E;
pub const FILE_NAME: u32 = 0x466E;
pub const FILE_MIME_TYPE: u32 = 0x4660;
pub const FILE_DATA: u32 = 0x465C;
pub const FILE_UID: u32 = 0x46AE;

// =============================================================================
// Chapters
// =============================================================================

pub const CHAPTERS: u32 = 0x1043_A770;
pub const EDITION_ENTRY: u32 = 0x45B9;
pub const EDITION_UID: u32 = 0x45BC;
pub const EDITION_FLAG_HIDDEN: u32 = 0x45BD;
pub const EDITION_FLAG_DEFAULT: u32 = 0x45DB;
pub const EDITION_FLAG_ORDERED: u32 = 0x45DD;
/// May nest inside itself.
pub const CHAPTER_ATOM: u32 = 0xB6;
pub const CHAPTER_UID: u32 = 0x73C4;
pub const CHAPTER_STRING_UID: u32 = 0x5654;
pub const CHAPTER_TIME_START: u32 = 0x91;
pub const CHAPTER_TIME_END: u32 = 0x92;
pub const CHAPTER_FLAG_HIDDEN: u32 = 0x98;
pub const CHAPTER_FLAG_ENABLED: u32 = 0x4598;
pub const CHAPTER_DISPLAY: u32 = 0x80;
pub const CHAP_STRING: u32 = 0x85;
pub const CHAP_LANGUAGE: u32 = 0x437C;
pub const CHAP_COUNTRY: u32 = 0x437E;

// =============================================================================
// Tags
// =============================================================================

pub const TAGS: u32 = 0x1254_C367;
pub const TAG: u32 = 0x7373;
pub const TARGETS: u32 = 0x63C0;
pub const TARGET_TYPE_VALUE: u32 = 0x68CA;
pub const TARGET_TYPE: u32 = 0x63CA;
pub const TAG_TRACK_UID: u32 = 0x63C5;
pub const TAG_EDITION_UID: u32 = 0x63C9;
pub const TAG_CHAPTER_UID: u32 = 0x63C4;
pub const TAG_ATTACHMENT_UID: u32 = 0x63C6;
/// May nest inside itself.
pub const SIMPLE_TAG: u32 = 0x67C8;
pub const TAG_NAME: u32 = 0x45A3;
pub const TAG_LANGUAGE: u32 = 0x447A;
pub const TAG_DEFAULT: u32 = 0x4484;
pub const TAG_STRING: u32 = 0x4487;
pub const TAG_BINARY: u32 = 0x4485;

const fn t(
    id: u32,
    name: &'static str,
    level: i32,
    kind: crate::kind::ElementKind,
) -> ElementTypeInfo {
    ElementTypeInfo::new(id, name, level, kind)
}

/// The Matroska schema table.
///
/// Fed to [`TypeRegistry::new`](crate::TypeRegistry::new), which rejects
/// duplicate ids; [`TypeRegistry::matroska`](crate::TypeRegistry::matroska)
/// builds it once per process.
pub const MATROSKA_TYPES: &[ElementTypeInfo] = &[
    // EBML header
    t(EBML, "EBML", 0, Master),
    t(EBML_VERSION, "EBMLVersion", 1, UInteger),
    t(EBML_READ_VERSION, "EBMLReadVersion", 1, UInteger),
    t(EBML_MAX_ID_LENGTH, "EBMLMaxIDLength", 1, UInteger),
    t(EBML_MAX_SIZE_LENGTH, "EBMLMaxSizeLength", 1, UInteger),
    t(DOC_TYPE, "DocType", 1, String),
    t(DOC_TYPE_VERSION, "DocTypeVersion", 1, UInteger),
    t(DOC_TYPE_READ_VERSION, "DocTypeReadVersion", 1, UInteger),
    // global
    t(VOID, "Void", -1, Binary),
    t(CRC_32, "CRC-32", -1, Binary),
    // segment
    t(SEGMENT, "Segment", 0, Master),
    t(SEEK_HEAD, "SeekHead", 1, Master),
    t(SEEK, "Seek", 2, Master),
    t(SEEK_ID, "SeekID", 3, Binary),
    t(SEEK_POSITION, "SeekPosition", 3, UInteger),
    // info
    t(INFO, "Info", 1, Master),
    t(SEGMENT_UID, "SegmentUID", 2, Binary),
    t(SEGMENT_FILENAME, "SegmentFilename", 2, Utf8),
    t(PREV_UID, "PrevUID", 2, Binary),
    t(PREV_FILENAME, "PrevFilename", 2, Utf8),
    t(NEXT_UID, "NextUID", 2, Binary),
    t(NEXT_FILENAME, "NextFilename", 2, Utf8),
    t(SEGMENT_FAMILY, "SegmentFamily", 2, Binary),
    t(TIMECODE_SCALE, "TimecodeScale", 2, UInteger),
    t(DURATION, "Duration", 2, Float),
    t(DATE_UTC, "DateUTC", 2, Date),
    t(TITLE, "Title", 2, Utf8),
    t(MUXING_APP, "MuxingApp", 2, Utf8),
    t(WRITING_APP, "WritingApp", 2, Utf8),
    // cluster
    t(CLUSTER, "Cluster", 1, Master),
    t(TIMECODE, "Timecode", 2, UInteger),
    t(SILENT_TRACKS, "SilentTracks", 2, Master),
    t(SILENT_TRACK_NUMBER, "SilentTrackNumber", 3, UInteger),
    t(POSITION, "Position", 2, UInteger),
    t(PREV_SIZE, "PrevSize", 2, UInteger),
    t(SIMPLE_BLOCK, "SimpleBlock", 2, Binary),
    t(BLOCK_GROUP, "BlockGroup", 2, Master),
    t(BLOCK, "Block", 3, Binary),
    t(BLOCK_ADDITIONS, "BlockAdditions", 3, Master),
    t(BLOCK_MORE, "BlockMore", 4, Master),
    t(BLOCK_ADD_ID, "BlockAddID", 5, UInteger),
    t(BLOCK_ADDITIONAL, "BlockAdditional", 5, Binary),
    t(BLOCK_DURATION, "BlockDuration", 3, UInteger),
    t(REFERENCE_PRIORITY, "ReferencePriority", 3, UInteger),
    t(REFERENCE_BLOCK, "ReferenceBlock", 3, Integer),
    t(CODEC_STATE, "CodecState", 3, Binary),
    t(DISCARD_PADDING, "DiscardPadding", 3, Integer),
    // tracks
    t(TRACKS, "Tracks", 1, Master),
    t(TRACK_ENTRY, "TrackEntry", 2, Master),
    t(TRACK_NUMBER, "TrackNumber", 3, UInteger),
    t(TRACK_UID, "TrackUID", 3, UInteger),
    t(TRACK_TYPE, "TrackType", 3, UInteger),
    t(FLAG_ENABLED, "FlagEnabled", 3, UInteger),
    t(FLAG_DEFAULT, "FlagDefault", 3, UInteger),
    t(FLAG_FORCED, "FlagForced", 3, UInteger),
    t(FLAG_LACING, "FlagLacing", 3, UInteger),
    t(MIN_CACHE, "MinCache", 3, UInteger),
    t(MAX_CACHE, "MaxCache", 3, UInteger),
    t(DEFAULT_DURATION, "DefaultDuration", 3, UInteger),
    t(MAX_BLOCK_ADDITION_ID, "MaxBlockAdditionID", 3, UInteger),
    t(NAME, "Name", 3, Utf8),
    t(LANGUAGE, "Language", 3, String),
    t(CODEC_ID, "CodecID", 3, String),
    t(CODEC_PRIVATE, "CodecPrivate", 3, Binary),
    t(CODEC_NAME, "CodecName", 3, Utf8),
    t(CODEC_DELAY, "CodecDelay", 3, UInteger),
    t(SEEK_PRE_ROLL, "SeekPreRoll", 3, UInteger),
    t(VIDEO, "Video", 3, Master),
    t(FLAG_INTERLACED, "FlagInterlaced", 4, UInteger),
    t(PIXEL_WIDTH, "PixelWidth", 4, UInteger),
    t(PIXEL_HEIGHT, "PixelHeight", 4, UInteger),
    t(PIXEL_CROP_BOTTOM, "PixelCropBottom", 4, UInteger),
    t(PIXEL_CROP_TOP, "PixelCropTop", 4, UInteger),
    t(PIXEL_CROP_LEFT, "PixelCropLeft", 4, UInteger),
    t(PIXEL_CROP_RIGHT, "PixelCropRight", 4, UInteger),
    t(DISPLAY_WIDTH, "DisplayWidth", 4, UInteger),
    t(DISPLAY_HEIGHT, "DisplayHeight", 4, UInteger),
    t(DISPLAY_UNIT, "DisplayUnit", 4, UInteger),
    t(ASPECT_RATIO_TYPE, "AspectRatioType", 4, UInteger),
    t(FRAME_RATE, "FrameRate", 4, Float),
    t(AUDIO, "Audio", 3, Master),
    t(SAMPLING_FREQUENCY, "SamplingFrequency", 4, Float),
    t(OUTPUT_SAMPLING_FREQUENCY, "OutputSamplingFrequency", 4, Float),
    t(CHANNELS, "Channels", 4, UInteger),
    t(BIT_DEPTH, "BitDepth", 4, UInteger),
    // cues
    t(CUES, "Cues", 1, Master),
    t(CUE_POINT, "CuePoint", 2, Master),
    t(CUE_TIME, "CueTime", 3, UInteger),
    t(CUE_TRACK_POSITIONS, "CueTrackPositions", 3, Master),
    t(CUE_TRACK, "CueTrack", 4, UInteger),
    t(CUE_CLUSTER_POSITION, "CueClusterPosition", 4, UInteger),
    t(CUE_RELATIVE_POSITION, "CueRelativePosition", 4, UInteger),
    t(CUE_DURATION, "CueDuration", 4, UInteger),
    t(CUE_BLOCK_NUMBER, "CueBlockNumber", 4, UInteger),
    // attachments
    t(ATTACHMENTS, "Attachments", 1, Master),
    t(ATTACHED_FILE, "AttachedFile", 2, Master),
    t(FILE_DESCRIPTION, "FileDescription", 3, Utf8),
    t(FILE_NAME, "FileName", 3, Utf8),
    t(FILE_MIME_TYPE, "FileMimeType", 3, String),
    t(FILE_DATA, "FileData", 3, Binary),
    t(FILE_UID, "FileUID", 3, UInteger),
    // chapters
    t(CHAPTERS, "Chapters", 1, Master),
    t(EDITION_ENTRY, "EditionEntry", 2, Master),
    t(EDITION_UID, "EditionUID", 3, UInteger),
    t(EDITION_FLAG_HIDDEN, "EditionFlagHidden", 3, UInteger),
    t(EDITION_FLAG_DEFAULT, "EditionFlagDefault", 3, UInteger),
    t(EDITION_FLAG_ORDERED, "EditionFlagOrdered", 3, UInteger),
    t(CHAPTER_ATOM, "ChapterAtom", 3, Master).recursive(),
    t(CHAPTER_UID, "ChapterUID", 4, UInteger),
    t(CHAPTER_STRING_UID, "ChapterStringUID", 4, Utf8),
    t(CHAPTER_TIME_START, "ChapterTimeStart", 4, UInteger),
    t(CHAPTER_TIME_END, "ChapterTimeEnd", 4, UInteger),
    t(CHAPTER_FLAG_HIDDEN, "ChapterFlagHidden", 4, UInteger),
    t(CHAPTER_FLAG_ENABLED, "ChapterFlagEnabled", 4, UInteger),
    t(CHAPTER_DISPLAY, "ChapterDisplay", 4, Master),
    t(CHAP_STRING, "ChapString", 5, Utf8),
    t(CHAP_LANGUAGE, "ChapLanguage", 5, String),
    t(CHAP_COUNTRY, "ChapCountry", 5, String),
    // tags
    t(TAGS, "Tags", 1, Master),
    t(TAG, "Tag", 2, Master),
    t(TARGETS, "Targets", 3, Master),
    t(TARGET_TYPE_VALUE, "TargetTypeValue", 4, UInteger),
    t(TARGET_TYPE, "TargetType", 4, String),
    t(TAG_TRACK_UID, "TagTrackUID", 4, UInteger),
    t(TAG_EDITION_UID, "TagEditionUID", 4, UInteger),
    t(TAG_CHAPTER_UID, "TagChapterUID", 4, UInteger),
    t(TAG_ATTACHMENT_UID, "TagAttachmentUID", 4, UInteger),
    t(SIMPLE_TAG, "SimpleTag", 3, Master).recursive(),
    t(TAG_NAME, "TagName", 4, Utf8),
    t(TAG_LANGUAGE, "TagLanguage", 4, String),
    t(TAG_DEFAULT, "TagDefault", 4, UInteger),
    t(TAG_STRING, "TagString", 4, Utf8),
    t(TAG_BINARY, "TagBinary", 4, Binary),
];
