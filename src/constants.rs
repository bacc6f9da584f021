//! IRC command verbs and numeric reply codes named as constants, so handler and filter code reads
//! `constants::ERR_NICKNAMEINUSE` rather than the bare literal `"433"`.

// Registration
pub const NICK: &str = "NICK";
pub const PASS: &str = "PASS";
pub const QUIT: &str = "QUIT";
pub const USER: &str = "USER";

// Channel ops
pub const JOIN: &str = "JOIN";
pub const PART: &str = "PART";
pub const TOPIC: &str = "TOPIC";
pub const KICK: &str = "KICK";
pub const INVITE: &str = "INVITE";
pub const MODE: &str = "MODE";
pub const NAMES: &str = "NAMES";
pub const LIST: &str = "LIST";

// Sending messages
pub const PRIVMSG: &str = "PRIVMSG";
pub const NOTICE: &str = "NOTICE";

// User queries
pub const WHO: &str = "WHO";
pub const WHOIS: &str = "WHOIS";
pub const WHOWAS: &str = "WHOWAS";

// Misc
pub const PING: &str = "PING";
pub const PONG: &str = "PONG";
pub const ERROR: &str = "ERROR";

// 001-004: sent upon successful registration.
pub const RPL_WELCOME: &str = "001";
pub const RPL_YOURHOST: &str = "002";
pub const RPL_CREATED: &str = "003";
pub const RPL_MYINFO: &str = "004";

// Replies to WHOIS.
pub const RPL_WHOISUSER: &str = "311";
pub const RPL_WHOISSERVER: &str = "312";
pub const RPL_WHOISOPERATOR: &str = "313";
pub const RPL_WHOISIDLE: &str = "317";
pub const RPL_ENDOFWHOIS: &str = "318";
pub const RPL_WHOISCHANNELS: &str = "319";

// Replies to NAMES / MOTD.
pub const RPL_NAMREPLY: &str = "353";
pub const RPL_ENDOFNAMES: &str = "366";
pub const RPL_MOTDSTART: &str = "375";
pub const RPL_MOTD: &str = "372";
pub const RPL_ENDOFMOTD: &str = "376";

// Errors relevant to registration and messaging.
pub const ERR_NOSUCHNICK: &str = "401";
pub const ERR_NOSUCHCHANNEL: &str = "403";
pub const ERR_CANNOTSENDTOCHAN: &str = "404";
pub const ERR_NONICKNAMEGIVEN: &str = "431";
pub const ERR_ERRONEUSNICKNAME: &str = "432";
pub const ERR_NICKNAMEINUSE: &str = "433";
pub const ERR_NICKCOLLISION: &str = "436";
pub const ERR_NOTREGISTERED: &str = "451";
pub const ERR_NEEDMOREPARAMS: &str = "461";
pub const ERR_ALREADYREGISTRED: &str = "462";
pub const ERR_PASSWDMISMATCH: &str = "464";

/// The largest legal size of an IRC line, including the trailing CR-LF.
pub const MAX_LINE_LENGTH: usize = 512;

/// CTCP ACTION framing bytes, used to send and recognise `/me`-style messages.
pub const ACTION_START: &[u8] = b"\x01ACTION ";
pub const ACTION_END: &[u8] = b"\x01";
