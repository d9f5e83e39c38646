mod channel_observer;

pub use channel_observer::ChannelObserver;
