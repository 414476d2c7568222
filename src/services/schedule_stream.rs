use std::any::Any;
use std::panic::AssertUnwindSafe;

use actix_web::web::Bytes;
use futures::channel::mpsc;
use futures::future;
use futures::{FutureExt, SinkExt, Stream, StreamExt};
use log::{error, info};
use uuid::Uuid;

use crate::models::events::ScheduleEvent;
use crate::models::schedule::ScheduleRequest;
use crate::services::schedule_service::{ScheduleError, ScheduleSequencer};

const EVENT_BUFFER: usize = 16;

/// Starts the sequencer in the background and returns its events as SSE frames.
///
/// Dropping the returned stream (client went away) makes the next emit fail,
/// which stops the sequencer; calls already in flight are not cancelled.
pub fn schedule_event_stream(
    sequencer: ScheduleSequencer,
    request: ScheduleRequest,
) -> impl Stream<Item = Result<Bytes, actix_web::Error>> {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    actix_web::rt::spawn(drive(sequencer, request, tx));

    // Nothing is forwarded after the first terminal event.
    rx.scan(false, |ended, event: ScheduleEvent| {
        if *ended {
            return future::ready(None);
        }
        *ended = event.is_terminal();
        future::ready(Some(Ok::<_, actix_web::Error>(Bytes::from(event.to_frame()))))
    })
}

async fn drive(
    sequencer: ScheduleSequencer,
    request: ScheduleRequest,
    mut tx: mpsc::Sender<ScheduleEvent>,
) {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] schedule started for {} places",
        request_id,
        request.places.len()
    );

    let outcome = AssertUnwindSafe(sequencer.run(&request, &mut tx))
        .catch_unwind()
        .await;

    let terminal = match outcome {
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            error!("[{}] schedule panicked: {}", request_id, reason);
            ScheduleEvent::Error {
                message: format!("Error: {}", reason),
                detail: format!("panic: {}", reason),
            }
        }
        Ok(Ok(result)) => {
            let completed = ScheduleEvent::Completed {
                message: "Schedule complete!".to_string(),
                result: Box::new(result),
            };
            if tx.send(completed).await.is_err() {
                info!("[{}] client disconnected before completion", request_id);
                return;
            }
            info!("[{}] schedule completed", request_id);
            ScheduleEvent::Done
        }
        Ok(Err(ScheduleError::Disconnected)) => {
            info!("[{}] client disconnected, stopping", request_id);
            return;
        }
        Ok(Err(e)) => {
            error!("[{}] schedule failed: {}", request_id, e);
            ScheduleEvent::Error {
                message: format!("Error: {}", e),
                detail: format!("{:?}", e),
            }
        }
    };

    // The receiver may already be gone; nothing else to do either way.
    let _ = tx.send(terminal).await;
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure".to_string()
    }
}
