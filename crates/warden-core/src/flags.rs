use crate::codec::{FlagDefinition, FlagTable};

/// Bit carried by `ADMINISTRATOR`; bypasses every other check where it applies.
pub const ADMINISTRATOR: u64 = 1 << 3;

// Positions are fixed per deployment; retired bits stay unassigned.
const PERMISSION_FLAGS: [FlagDefinition; 42] = [
    FlagDefinition::new("CREATE_INSTANT_INVITE", 0),
    FlagDefinition::new("KICK_MEMBERS", 1),
    FlagDefinition::new("BAN_MEMBERS", 2),
    FlagDefinition::new("ADMINISTRATOR", 3),
    FlagDefinition::new("MANAGE_CHANNELS", 4),
    FlagDefinition::new("MANAGE_GUILD", 5),
    FlagDefinition::new("ADD_REACTIONS", 6),
    FlagDefinition::new("VIEW_AUDIT_LOG", 7),
    FlagDefinition::new("PRIORITY_SPEAKER", 8),
    FlagDefinition::new("STREAM", 9),
    FlagDefinition::new("VIEW_CHANNEL", 10),
    FlagDefinition::new("SEND_MESSAGES", 11),
    FlagDefinition::new("SEND_TTS_MESSAGES", 12),
    FlagDefinition::new("MANAGE_MESSAGES", 13),
    FlagDefinition::new("EMBED_LINKS", 14),
    FlagDefinition::new("ATTACH_FILES", 15),
    FlagDefinition::new("READ_MESSAGE_HISTORY", 16),
    FlagDefinition::new("MENTION_EVERYONE", 17),
    FlagDefinition::new("USE_EXTERNAL_EMOJIS", 18),
    FlagDefinition::new("CONNECT", 20),
    FlagDefinition::new("SPEAK", 21),
    FlagDefinition::new("MUTE_MEMBERS", 22),
    FlagDefinition::new("DEAFEN_MEMBERS", 23),
    FlagDefinition::new("MOVE_MEMBERS", 24),
    FlagDefinition::new("CHANGE_NICKNAME", 26),
    FlagDefinition::new("MANAGE_NICKNAMES", 27),
    FlagDefinition::new("MANAGE_ROLES", 28),
    FlagDefinition::new("MANAGE_WEBHOOKS", 29),
    FlagDefinition::new("MANAGE_EMOJIS", 30),
    FlagDefinition::new("USE_APPLICATION_COMMANDS", 31),
    FlagDefinition::new("MANAGE_EVENTS", 33),
    FlagDefinition::new("MANAGE_THREADS", 34),
    FlagDefinition::new("CREATE_PUBLIC_THREADS", 35),
    FlagDefinition::new("CREATE_PRIVATE_THREADS", 36),
    FlagDefinition::new("USE_EXTERNAL_STICKERS", 37),
    FlagDefinition::new("SEND_MESSAGES_IN_THREADS", 38),
    FlagDefinition::new("MODERATE_MEMBERS", 40),
    FlagDefinition::new("USE_SOUNDBOARD", 42),
    FlagDefinition::new("CREATE_EXPRESSIONS", 43),
    FlagDefinition::new("CREATE_EVENTS", 44),
    FlagDefinition::new("USE_EXTERNAL_SOUNDS", 45),
    FlagDefinition::new("SEND_VOICE_MESSAGES", 46),
];

const PERK_FLAGS: [FlagDefinition; 7] = [
    FlagDefinition::new("CHANGE_USERNAME", 0),
    FlagDefinition::new("ANIMATED_AVATAR", 1),
    FlagDefinition::new("PROFILE_BANNER", 2),
    FlagDefinition::new("REPUTATION_ABILITY", 4),
    FlagDefinition::new("LARGER_UPLOADS", 5),
    FlagDefinition::new("CUSTOM_STATUS_EMOJI", 7),
    FlagDefinition::new("EXTENDED_BIO", 8),
];

/// Channel and guild capabilities.
pub const PERMISSIONS: FlagTable = FlagTable::new("permissions", &PERMISSION_FLAGS);

/// Subscription-gated capabilities.
pub const PERKS: FlagTable = FlagTable::new("perks", &PERK_FLAGS);
