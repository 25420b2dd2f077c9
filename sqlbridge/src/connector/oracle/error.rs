use crate::{
    config::ConnectionConfig,
    connector::backend::parenthesized,
    error::{Error, ErrorKind},
    native::NativeError,
};

fn builder_for(kind: ErrorKind, err: NativeError) -> Error {
    let mut builder = Error::builder(kind);

    builder.set_original_code(format!("ORA-{:05}", err.code));
    builder.set_original_message(err.message);

    builder.build()
}

pub(crate) fn connect_error(config: &ConnectionConfig, err: NativeError) -> Error {
    let kind = match err.code {
        // invalid credentials, locked or expired account, missing CREATE SESSION
        1017 | 1005 | 28000 | 28001 | 1045 => ErrorKind::AuthFailed {
            user: config.username().to_string(),
        },
        // TNS: unresolved name, unknown service, no listener, unknown host, timeouts
        12154 | 12514 | 12541 | 12543 | 12545 | 12170 | 12535 => ErrorKind::Unreachable {
            host: config.host().to_string(),
        },
        _ => ErrorKind::ProtocolError,
    };

    builder_for(kind, err)
}

pub(crate) fn statement_error(err: NativeError) -> Error {
    let kind = match err.code {
        900..=999 | 1008 | 1756 | 6550 => ErrorKind::SyntaxError,
        1 | 1400 | 1407 | 2290 | 2291 | 2292 => ErrorKind::ConstraintViolation {
            constraint: parenthesized(&err.message),
        },
        3113 | 3114 | 3135 | 12537 | 12547 | 28 => ErrorKind::ConnectionLost,
        1013 | 54 | 30006 | 12170 => ErrorKind::Timeout,
        _ => ErrorKind::Unknown,
    };

    builder_for(kind, err)
}
