mod display_state;
