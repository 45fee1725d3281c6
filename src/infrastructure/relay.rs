pub mod form_relay;
