//! Chain composition.
//!
//! A chain is not a type — it is a [`BoxedHandler`] like any other, produced
//! by folding an ordered middleware list around a terminal handler:
//!
//! ```text
//! chain = M1.wrap(M2.wrap(… Mn.wrap(H)))
//! ```
//!
//! The fold runs right-to-left so that the *first registered* middleware
//! ends up outermost. Invoking the chain then runs M1's pre-processing,
//! M2's, …, Mn's, the terminal handler, and unwinds through Mn's
//! post-processing back out to M1's — strict stack discipline, identical to
//! nested function calls.
//!
//! Composition is pure: it consults no global state, and folding the same
//! list around the same terminal handler twice yields two chains with
//! identical behavior. Zero middlewares compose to the terminal handler
//! itself.

use std::sync::Arc;

use crate::handler::BoxedHandler;
use crate::middleware::Middleware;

/// Folds `middlewares` around `terminal`, first entry outermost.
///
/// The router calls this once per route when it freezes; call it directly to
/// use middlewares without a router.
pub fn compose(middlewares: &[Arc<dyn Middleware>], terminal: BoxedHandler) -> BoxedHandler {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, mw| mw.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::middleware::from_fn;
    use crate::request::Request;
    use crate::response::Response;
    use crate::status::Status;
    use std::sync::Mutex;

    type Events = Arc<Mutex<Vec<String>>>;

    /// A middleware that records when it enters and exits.
    fn recording(name: &'static str, events: &Events) -> Arc<dyn Middleware> {
        let events = Arc::clone(events);
        Arc::new(from_fn(move |req: Request, next: BoxedHandler| {
            let events = Arc::clone(&events);
            async move {
                events.lock().unwrap().push(format!("enter {name}"));
                let resp = next.call(req).await;
                events.lock().unwrap().push(format!("exit {name}"));
                resp
            }
        }))
    }

    fn recording_terminal(events: &Events) -> BoxedHandler {
        let events = Arc::clone(events);
        (move |_req: Request| {
            let events = Arc::clone(&events);
            async move {
                events.lock().unwrap().push("enter handler".to_owned());
                events.lock().unwrap().push("exit handler".to_owned());
                Response::text("hello")
            }
        })
        .into_boxed_handler()
    }

    #[tokio::test]
    async fn first_registered_runs_first_in_and_last_out() {
        let events: Events = Arc::default();
        let mws = vec![recording("m1", &events), recording("m2", &events)];

        let chained = compose(&mws, recording_terminal(&events));
        chained.call(Request::new("GET", "/")).await;

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "enter m1",
                "enter m2",
                "enter handler",
                "exit handler",
                "exit m2",
                "exit m1",
            ],
        );
    }

    #[tokio::test]
    async fn zero_middlewares_compose_to_the_terminal_handler() {
        let events: Events = Arc::default();
        let chained = compose(&[], recording_terminal(&events));
        let resp = chained.call(Request::new("GET", "/")).await;

        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.body(), b"hello");
        assert_eq!(*events.lock().unwrap(), vec!["enter handler", "exit handler"]);
    }

    #[tokio::test]
    async fn composing_the_same_list_twice_behaves_identically() {
        let events: Events = Arc::default();
        let mws = vec![recording("m1", &events), recording("m2", &events)];

        let first = compose(&mws, recording_terminal(&events));
        let second = compose(&mws, recording_terminal(&events));

        let a = first.call(Request::new("GET", "/")).await;
        let trace_a = std::mem::take(&mut *events.lock().unwrap());
        let b = second.call(Request::new("GET", "/")).await;
        let trace_b = std::mem::take(&mut *events.lock().unwrap());

        assert_eq!(a.status_code(), b.status_code());
        assert_eq!(a.body(), b.body());
        assert_eq!(trace_a, trace_b);
    }

    #[tokio::test]
    async fn short_circuit_skips_everything_downstream() {
        let events: Events = Arc::default();

        let gate = Arc::new(from_fn(|req: Request, next: BoxedHandler| async move {
            if req.header("authorization").is_none() {
                return Response::status(Status::Unauthorized);
            }
            next.call(req).await
        })) as Arc<dyn Middleware>;

        let mws = vec![gate, recording("inner", &events)];
        let chained = compose(&mws, recording_terminal(&events));

        let denied = chained.call(Request::new("GET", "/")).await;
        assert_eq!(denied.status_code(), 401);
        assert!(denied.body().is_empty());
        assert!(events.lock().unwrap().is_empty(), "nothing past the gate may run");

        let allowed = chained
            .call(Request::new("GET", "/").with_header("authorization", "Bearer t"))
            .await;
        assert_eq!(allowed.status_code(), 200);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["enter inner", "enter handler", "exit handler", "exit inner"],
        );
    }
}
