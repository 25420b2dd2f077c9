use crate::{
    config::ConnectionConfig,
    connector::backend::last_quoted,
    error::{Error, ErrorKind},
    native::NativeError,
};

// Server message numbers are below 20000, DB-Library's own errors above.
const SYBECONN: i32 = 20009;
const SYBESERVER: i32 = 20012;
const SYBETIME: i32 = 20003;
const SYBEPWD: i32 = 20014;
const SYBESEOF: i32 = 20017;
const SYBEREAD: i32 = 20004;
const SYBEWRIT: i32 = 20006;
const SYBEDDNE: i32 = 20047;

fn builder_for(kind: ErrorKind, err: NativeError) -> Error {
    let mut builder = Error::builder(kind);

    builder.set_original_code(format!("{}", err.code));
    builder.set_original_message(err.message);

    builder.build()
}

pub(crate) fn connect_error(config: &ConnectionConfig, err: NativeError) -> Error {
    let kind = match err.code {
        4002 | 4067 | SYBEPWD => ErrorKind::AuthFailed {
            user: config.username().to_string(),
        },
        SYBECONN | SYBESERVER | SYBETIME => ErrorKind::Unreachable {
            host: config.host().to_string(),
        },
        _ => ErrorKind::ProtocolError,
    };

    builder_for(kind, err)
}

pub(crate) fn statement_error(err: NativeError) -> Error {
    let kind = match err.code {
        102 | 103 | 104 | 105 | 137 | 156 | 201 | 207 | 208 | 2812 | 8144 | 8145 => ErrorKind::SyntaxError,
        233 | 515 => ErrorKind::ConstraintViolation { constraint: None },
        546 | 547 | 548 | 2601 | 2615 => ErrorKind::ConstraintViolation {
            constraint: last_quoted(&err.message),
        },
        SYBEREAD | SYBEWRIT | SYBEDDNE | SYBESEOF => ErrorKind::ConnectionLost,
        SYBETIME | 12205 => ErrorKind::Timeout,
        _ => ErrorKind::Unknown,
    };

    builder_for(kind, err)
}
