//! Integration test: framed calls over loopback TCP and UDP.

use std::net::SocketAddr;

use rpctest_protocol::transport::AsyncEndpoint;
use rpctest_protocol::{call_tcp, call_udp, read_frame, wire, write_frame, Endpoint};
use rpctest_types::{CallMessage, ProgramId, Protocol, ReplyBody, ReplyMessage, NULLPROC};

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

fn echo_reply(call: &CallMessage) -> ReplyMessage {
    ReplyMessage {
        xid: call.xid,
        body: ReplyBody::Success(call.args.clone()),
    }
}

#[tokio::test]
async fn tcp_call_on_loopback() {
    let endpoint = Endpoint::bind(Protocol::Tcp, loopback()).unwrap();
    let addr = endpoint.local_addr().unwrap();
    let AsyncEndpoint::Tcp(listener) = endpoint.into_async().unwrap() else {
        panic!("expected a tcp endpoint");
    };

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        while let Some(call) = read_frame::<_, CallMessage>(&mut stream).await.unwrap() {
            write_frame(&mut stream, &echo_reply(&call)).await.unwrap();
        }
    });

    let call = CallMessage {
        xid: 17,
        program: ProgramId::square(),
        procedure: NULLPROC,
        args: vec![4, 5, 6],
    };
    let reply = call_tcp(addr, &call).await.unwrap();
    assert_eq!(reply.xid, 17);
    assert_eq!(reply.body, ReplyBody::Success(vec![4, 5, 6]));

    server.await.unwrap();
}

#[tokio::test]
async fn udp_call_on_loopback() {
    let endpoint = Endpoint::bind(Protocol::Udp, loopback()).unwrap();
    let addr = endpoint.local_addr().unwrap();
    let AsyncEndpoint::Udp(socket) = endpoint.into_async().unwrap() else {
        panic!("expected a udp endpoint");
    };

    let server = tokio::spawn(async move {
        let mut buf = vec![0u8; wire::MAX_DATAGRAM_SIZE];
        let (n, peer) = socket.recv_from(&mut buf).await.unwrap();
        let call: CallMessage = wire::decode_message(&buf[..n]).unwrap();

        // A stale reply first: the client must skip it.
        let stale = ReplyMessage {
            xid: call.xid.wrapping_add(1),
            body: ReplyBody::SystemErr,
        };
        let bytes = wire::encode_payload(&stale).unwrap();
        socket.send_to(&bytes, peer).await.unwrap();

        let bytes = wire::encode_payload(&echo_reply(&call)).unwrap();
        socket.send_to(&bytes, peer).await.unwrap();
    });

    let call = CallMessage {
        xid: 3,
        program: ProgramId::square(),
        procedure: NULLPROC,
        args: vec![],
    };
    let reply = call_udp(addr, &call).await.unwrap();
    assert_eq!(reply.xid, 3);
    assert_eq!(reply.body, ReplyBody::Success(vec![]));

    server.await.unwrap();
}
