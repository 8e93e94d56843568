//! The square test program.

use rpctest_protocol::wire;
use rpctest_types::{ReplyBody, SquareIn, SquareOut, NULLPROC, SQUAREPROC};
use tracing::debug;

use crate::Dispatch;

/// Version 1 of the square program: `SQUAREPROC` returns `arg1 * arg1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquareService;

impl Dispatch for SquareService {
    fn dispatch(&self, procedure: u32, args: &[u8]) -> ReplyBody {
        match procedure {
            NULLPROC => ReplyBody::Success(Vec::new()),
            SQUAREPROC => {
                let Ok(SquareIn { arg1 }) = wire::decode_message::<SquareIn>(args) else {
                    return ReplyBody::GarbageArgs;
                };
                let Some(res1) = arg1.checked_mul(arg1) else {
                    debug!(arg1, "square overflows");
                    return ReplyBody::SystemErr;
                };
                match wire::encode_payload(&SquareOut { res1 }) {
                    Ok(bytes) => ReplyBody::Success(bytes),
                    Err(_) => ReplyBody::SystemErr,
                }
            }
            _ => ReplyBody::ProcUnavail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(arg1: i64) -> ReplyBody {
        let args = wire::encode_payload(&SquareIn { arg1 }).unwrap();
        SquareService.dispatch(SQUAREPROC, &args)
    }

    #[test]
    fn squares_its_argument() {
        let ReplyBody::Success(bytes) = square(-12) else {
            panic!("expected success");
        };
        let out: SquareOut = wire::decode_message(&bytes).unwrap();
        assert_eq!(out.res1, 144);
    }

    #[test]
    fn overflow_is_system_error() {
        assert_eq!(square(i64::MAX), ReplyBody::SystemErr);
    }

    #[test]
    fn null_and_unknown_procedures() {
        assert_eq!(SquareService.dispatch(NULLPROC, &[]), ReplyBody::Success(vec![]));
        assert_eq!(SquareService.dispatch(42, &[]), ReplyBody::ProcUnavail);
    }

    #[test]
    fn undecodable_args_are_garbage() {
        assert_eq!(SquareService.dispatch(SQUAREPROC, &[]), ReplyBody::GarbageArgs);
    }
}
