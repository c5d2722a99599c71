use std::env;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use snvpipe_shared::JobDescriptor;

use crate::submit::{dispatch_job, HttpBatchSubmitter};

#[macro_use]
extern crate rocket;

mod submit;

#[post("/jobs", format = "json", data = "<descriptor>")]
async fn dispatch(
    submitter: &State<HttpBatchSubmitter>,
    descriptor: Json<JobDescriptor>,
) -> Result<Json<JobDescriptor>, Status> {
    match dispatch_job(submitter.inner(), descriptor.into_inner()).await {
        Ok(descriptor) => Ok(Json(descriptor)),
        Err(err) => {
            // log and re-raise: the orchestrator marks the stage failed on a 500
            error!("dispatch failed: {:#}", err);
            Err(Status::InternalServerError)
        }
    }
}

#[launch]
fn rocket() -> _ {
    let endpoint = match env::var("BATCH_SUBMIT_URL") {
        Ok(endpoint) => endpoint,
        Err(_) => panic!("required environment variable: BATCH_SUBMIT_URL"),
    };

    rocket::build()
        .manage(HttpBatchSubmitter::new(endpoint))
        .mount("/", routes![dispatch])
}
