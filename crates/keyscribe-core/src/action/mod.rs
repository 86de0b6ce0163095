//! Extension → host single-slot action mailbox.

mod receiver;
mod sender;

pub use {receiver::ActionReceiver, sender::ActionSender};
