mod duration_ticker;
