// Communication channels lock-free

use crate::messaging::event::ClickEvent;
use ringbuf::{HeapRb, traits::Split};

pub type ClickProducer = ringbuf::HeapProd<ClickEvent>;
pub type ClickConsumer = ringbuf::HeapCons<ClickEvent>;

pub fn create_click_channel(capacity: usize) -> (ClickProducer, ClickConsumer) {
    let rb = HeapRb::<ClickEvent>::new(capacity);
    rb.split()
}
