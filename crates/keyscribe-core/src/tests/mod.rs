mod notify;
mod recorder;
